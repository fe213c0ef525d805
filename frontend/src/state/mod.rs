pub mod attendance;
pub mod attendance_requests;
pub mod employee;
pub mod leave;
pub mod payslip;
pub mod slot;

use leptos::*;

use crate::api::{
    ApiClient, AttendanceApi, AttendanceRequestApi, EmployeeApi, LeaveApi, PayslipApi,
};

pub use attendance::AttendanceStore;
pub use attendance_requests::{filter_requests, AttendanceRequestsStore, RequestFilter};
pub use employee::EmployeeStore;
pub use leave::LeaveStore;
pub use payslip::PayslipStore;
pub use slot::{reset_slot, FetchStatus, Keyed, SlotState};

/// Every entity store of the portal, sharing one API client.
#[derive(Debug, Clone)]
pub struct PortalStores {
    pub attendance: AttendanceStore,
    pub attendance_requests: AttendanceRequestsStore,
    pub leave: LeaveStore,
    pub employee: EmployeeStore,
    pub payslip: PayslipStore,
}

impl PortalStores {
    pub fn new(client: ApiClient) -> Self {
        Self {
            attendance: AttendanceStore::new(AttendanceApi::new(client.clone())),
            attendance_requests: AttendanceRequestsStore::new(AttendanceRequestApi::new(
                client.clone(),
            )),
            leave: LeaveStore::new(LeaveApi::new(client.clone())),
            employee: EmployeeStore::new(EmployeeApi::new(client.clone())),
            payslip: PayslipStore::new(PayslipApi::new(client)),
        }
    }

    /// Clears every store, e.g. on sign-out.
    pub fn reset_all(&self) {
        self.attendance.reset();
        self.attendance_requests.reset();
        self.leave.reset();
        self.employee.reset();
        self.payslip.reset();
    }
}

pub fn provide_portal_stores(client: ApiClient) -> PortalStores {
    let stores = PortalStores::new(client);
    provide_context(stores.clone());
    stores
}

pub fn use_portal_stores() -> Option<PortalStores> {
    use_context::<PortalStores>()
}
