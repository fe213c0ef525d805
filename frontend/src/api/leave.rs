use serde_json::json;

use super::{
    client::{ApiClient, FetchOptions},
    crud::CrudApi,
    models::EmployeeLeave,
    types::{ApiEnvelope, ApiError},
};

pub const LEAVES_PATH: &str = "/api/portal/leaves";
const LEAVE_STATUS_ROOT: &str = "/api/leaves";

#[derive(Debug, Clone)]
pub struct LeaveApi {
    crud: CrudApi<EmployeeLeave>,
}

impl LeaveApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            crud: CrudApi::new(client, LEAVES_PATH),
        }
    }

    /// Generic list/get/create/update/remove on the resource root.
    pub fn crud(&self) -> &CrudApi<EmployeeLeave> {
        &self.crud
    }

    /// Moves a leave to another review status. The code is passed through untouched.
    pub async fn update_status(
        &self,
        id: u64,
        status: u8,
    ) -> Result<ApiEnvelope<EmployeeLeave>, ApiError> {
        let path = format!("{}/{}/status", LEAVE_STATUS_ROOT, id);
        self.crud
            .client()
            .fetch(&path, FetchOptions::put(&json!({ "status": status }))?)
            .await
    }
}
