use super::{client::ApiClient, crud::CrudApi, models::Payslip};

pub const PAYSLIP_PATH: &str = "/api/portal/payslip";

#[derive(Debug, Clone)]
pub struct PayslipApi {
    crud: CrudApi<Payslip>,
}

impl PayslipApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            crud: CrudApi::new(client, PAYSLIP_PATH),
        }
    }

    /// Generic list/get/create/update/remove on the resource root.
    pub fn crud(&self) -> &CrudApi<Payslip> {
        &self.crud
    }
}
