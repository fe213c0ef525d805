use leptos::*;

use super::slot::{fetch_slot, reset_slot, FetchStatus, SlotState};
use crate::api::{
    models::{EmployeeLeave, EmployeeLeaveBuckets, LookupOption},
    ApiEnvelope, ApiError, LeaveApi,
};

pub const LEAVE_TYPES: [LookupOption; 2] = [
    LookupOption { id: 0, title: "Sick Leave" },
    LookupOption { id: 1, title: "Vacation Leave" },
];

pub const LEAVE_DAY_TYPES: [LookupOption; 2] = [
    LookupOption { id: 1, title: "Whole Day" },
    LookupOption { id: 2, title: "Half Day" },
];

/// The employee's leaves, split into pending, approved and rejected.
#[derive(Debug, Clone)]
pub struct LeaveStore {
    api: LeaveApi,
    state: RwSignal<SlotState<EmployeeLeaveBuckets>>,
}

impl LeaveStore {
    pub fn new(api: LeaveApi) -> Self {
        Self {
            api,
            state: create_rw_signal(SlotState::default()),
        }
    }

    pub fn state(&self) -> RwSignal<SlotState<EmployeeLeaveBuckets>> {
        self.state
    }

    pub async fn fetch(&self, refresh: bool) -> Result<FetchStatus, ApiError> {
        fetch_slot(
            self.state,
            refresh,
            |_| true,
            || self.api.crud().get::<EmployeeLeaveBuckets>(false),
            |buckets| buckets,
        )
        .await
    }

    /// Files a leave. A confirmed leave goes to the front of `pending`.
    pub async fn create(&self, leave: &EmployeeLeave) -> Result<ApiEnvelope<EmployeeLeave>, ApiError> {
        let envelope = self.api.crud().create(leave).await?;
        match envelope.data() {
            Some(created) => self.state.update(|state| {
                if let Some(buckets) = &mut state.data {
                    buckets.pending.insert(0, created.clone());
                }
            }),
            None => {
                if let Some(failure) = envelope.failure() {
                    log::debug!("leave rejected: {}", failure.summary());
                }
            }
        }
        Ok(envelope)
    }

    pub fn reset(&self) {
        reset_slot(self.state);
    }
}
