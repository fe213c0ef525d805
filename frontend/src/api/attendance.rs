use chrono::NaiveDate;
use serde_json::json;

use super::{
    client::{ApiClient, FetchOptions},
    crud::CrudApi,
    models::{Attendance, AttendanceDetail},
    types::{ApiEnvelope, ApiError},
};

pub const ATTENDANCE_PATH: &str = "/api/portal/attendance";
const BY_EMPLOYEE_DATE_PATH: &str = "/api/attendance/by-employee-date";
const BY_DATE_PATH: &str = "/api/portal/attendance/by-date";

#[derive(Debug, Clone)]
pub struct AttendanceApi {
    crud: CrudApi<Attendance>,
}

impl AttendanceApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            crud: CrudApi::new(client, ATTENDANCE_PATH),
        }
    }

    /// Generic list/get/create/update/remove on the resource root.
    pub fn crud(&self) -> &CrudApi<Attendance> {
        &self.crud
    }

    /// Attendance of one employee on one day, as seen by an approver.
    pub async fn get_by_employee_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<ApiEnvelope<Option<AttendanceDetail>>, ApiError> {
        let options = FetchOptions::get()
            .with_query(&json!({ "employee_id": employee_id, "att_date": date }))?;
        self.crud.client().fetch(BY_EMPLOYEE_DATE_PATH, options).await
    }

    /// The signed-in employee's attendance for `date`; `None` when nothing was logged.
    pub async fn get_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<ApiEnvelope<Option<AttendanceDetail>>, ApiError> {
        let options = FetchOptions::get().with_query(&json!({ "att_date": date }))?;
        self.crud.client().fetch(BY_DATE_PATH, options).await
    }
}
