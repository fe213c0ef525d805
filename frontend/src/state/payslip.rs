use leptos::*;

use super::slot::{fetch_slot, reset_slot, FetchStatus, Keyed, SlotState};
use crate::api::{models::Payslip, ApiError, PayslipApi};

/// Payslips keyed by the `latest` flag they were fetched with.
pub type PayslipSlot = SlotState<Keyed<bool, Vec<Payslip>>>;

#[derive(Debug, Clone)]
pub struct PayslipStore {
    api: PayslipApi,
    state: RwSignal<PayslipSlot>,
}

impl PayslipStore {
    pub fn new(api: PayslipApi) -> Self {
        Self {
            api,
            state: create_rw_signal(SlotState::default()),
        }
    }

    pub fn state(&self) -> RwSignal<PayslipSlot> {
        self.state
    }

    pub fn payslips(&self) -> Vec<Payslip> {
        self.state.with(|state| {
            state
                .data
                .as_ref()
                .map(|cached| cached.value.clone())
                .unwrap_or_default()
        })
    }

    pub async fn fetch(&self, latest: bool, refresh: bool) -> Result<FetchStatus, ApiError> {
        fetch_slot(
            self.state,
            refresh,
            |cached| cached.key == latest,
            || self.api.crud().get::<Vec<Payslip>>(latest),
            |value| Keyed { key: latest, value },
        )
        .await
    }

    pub fn reset(&self) {
        reset_slot(self.state);
    }
}
