use leptos::*;

use super::slot::{fetch_slot, reset_slot, FetchStatus, SlotState};
use crate::api::{
    models::{Employee, LookupOption},
    ApiError, EmployeeApi, ImageUpload, UploadReceipt,
};

pub const MARITAL_STATUSES: [LookupOption; 3] = [
    LookupOption { id: 1, title: "Single" },
    LookupOption { id: 2, title: "Married" },
    LookupOption { id: 3, title: "Widowed" },
];

pub const GENDERS: [LookupOption; 2] = [
    LookupOption { id: 1, title: "Male" },
    LookupOption { id: 2, title: "Female" },
];

pub const EMPLOYMENT_STATUSES: [LookupOption; 15] = [
    LookupOption { id: 1, title: "Training" },
    LookupOption { id: 2, title: "Probationary" },
    LookupOption { id: 3, title: "Regular" },
    LookupOption { id: 4, title: "Resigned" },
    LookupOption { id: 5, title: "Terminated" },
    LookupOption { id: 6, title: "Retired" },
    LookupOption { id: 7, title: "AWOL" },
    LookupOption { id: 8, title: "On Leave" },
    LookupOption { id: 9, title: "Retrenched" },
    LookupOption { id: 10, title: "Deceased" },
    LookupOption { id: 11, title: "Forced Leave" },
    LookupOption { id: 12, title: "Contractual" },
    LookupOption { id: 13, title: "Suspended" },
    LookupOption { id: 14, title: "Part-Time" },
    LookupOption { id: 15, title: "Fixed Term" },
];

pub const EDUCATION_LEVELS: [LookupOption; 5] = [
    LookupOption { id: 1, title: "Elementary" },
    LookupOption { id: 2, title: "High School" },
    LookupOption { id: 3, title: "Vocational" },
    LookupOption { id: 4, title: "College" },
    LookupOption { id: 5, title: "Graduate Studies" },
];

pub const FAMILY_RELATIONS: [LookupOption; 8] = [
    LookupOption { id: 1, title: "Father" },
    LookupOption { id: 2, title: "Mother" },
    LookupOption { id: 3, title: "Brother" },
    LookupOption { id: 4, title: "Sister" },
    LookupOption { id: 5, title: "Husband" },
    LookupOption { id: 6, title: "Wife" },
    LookupOption { id: 7, title: "Child" },
    LookupOption { id: 8, title: "Grand Parent" },
];

/// Profile of the signed-in employee.
#[derive(Debug, Clone)]
pub struct EmployeeStore {
    api: EmployeeApi,
    state: RwSignal<SlotState<Employee>>,
}

impl EmployeeStore {
    pub fn new(api: EmployeeApi) -> Self {
        Self {
            api,
            state: create_rw_signal(SlotState::default()),
        }
    }

    pub fn state(&self) -> RwSignal<SlotState<Employee>> {
        self.state
    }

    pub async fn fetch(&self, refresh: bool) -> Result<FetchStatus, ApiError> {
        fetch_slot(
            self.state,
            refresh,
            |_| true,
            || self.api.crud().get::<Employee>(false),
            |employee| employee,
        )
        .await
    }

    /// Uploads a new profile picture for the loaded employee, then reloads the
    /// profile so `image` points at the stored file. A failed reload lands in
    /// the slot's `error`; the receipt is still returned.
    pub async fn upload_image(&self, image: &ImageUpload) -> Result<UploadReceipt, ApiError> {
        let employee_id = self
            .state
            .with_untracked(|state| state.data.as_ref().and_then(|employee| employee.employee_id))
            .ok_or_else(|| ApiError::invalid_request("no employee profile loaded"))?;

        let receipt = self.api.upload_image(employee_id, image).await?;
        if receipt.is_success() {
            if let Err(error) = self.fetch(true).await {
                log::warn!("image stored but profile reload failed: {}", error);
            }
        }
        Ok(receipt)
    }

    pub fn reset(&self) {
        reset_slot(self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::lookup_title;

    #[test]
    fn lookup_tables_cover_known_ids() {
        assert_eq!(lookup_title(&MARITAL_STATUSES, 3), Some("Widowed"));
        assert_eq!(lookup_title(&GENDERS, 1), Some("Male"));
        assert_eq!(lookup_title(&EMPLOYMENT_STATUSES, 14), Some("Part-Time"));
        assert_eq!(lookup_title(&EDUCATION_LEVELS, 4), Some("College"));
        assert_eq!(lookup_title(&FAMILY_RELATIONS, 8), Some("Grand Parent"));
        assert_eq!(lookup_title(&EMPLOYMENT_STATUSES, 16), None);
    }

    #[test]
    fn employment_status_ids_are_sequential() {
        for (index, option) in EMPLOYMENT_STATUSES.iter().enumerate() {
            assert_eq!(usize::from(option.id), index + 1);
        }
    }
}
