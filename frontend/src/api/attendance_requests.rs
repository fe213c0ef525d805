use super::{client::ApiClient, crud::CrudApi, models::AttendanceRequest};

pub const ATTENDANCE_REQUESTS_PATH: &str = "/api/portal/attendance/requests";

/// COA/OB/OT requests filed by the signed-in employee. Plain CRUD.
#[derive(Debug, Clone)]
pub struct AttendanceRequestApi {
    crud: CrudApi<AttendanceRequest>,
}

impl AttendanceRequestApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            crud: CrudApi::new(client, ATTENDANCE_REQUESTS_PATH),
        }
    }

    /// Generic list/get/create/update/remove on the resource root.
    pub fn crud(&self) -> &CrudApi<AttendanceRequest> {
        &self.crud
    }
}
