pub mod attendance;
pub mod attendance_requests;
pub mod auth;
pub mod client;
pub mod crud;
pub mod employee;
pub mod leave;
pub mod models;
pub mod payslip;
pub mod query;
pub mod types;

pub use attendance::AttendanceApi;
pub use attendance_requests::AttendanceRequestApi;
pub use auth::AuthContext;
pub use client::*;
pub use crud::{CrudApi, ListParams, PageParam};
pub use employee::{EmployeeApi, ImageUpload, UploadReceipt};
pub use leave::LeaveApi;
pub use payslip::PayslipApi;
pub use types::*;

#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod test_support;
