use chrono::NaiveDate;
use leptos::*;

use super::slot::{fetch_slot, reset_slot, FetchStatus, Keyed, SlotState};
use crate::api::{
    models::{Attendance, AttendanceDetail, AttendanceQuery, AttendanceSchedule, Schedule},
    ApiError, AttendanceApi,
};

pub type ScheduleSlot = SlotState<Keyed<AttendanceQuery, AttendanceSchedule>>;
pub type DaySlot = SlotState<Keyed<NaiveDate, Option<AttendanceDetail>>>;

/// Attendance and schedules of the signed-in employee, plus a single-day detail.
#[derive(Debug, Clone)]
pub struct AttendanceStore {
    api: AttendanceApi,
    schedule: RwSignal<ScheduleSlot>,
    day: RwSignal<DaySlot>,
}

impl AttendanceStore {
    pub fn new(api: AttendanceApi) -> Self {
        Self {
            api,
            schedule: create_rw_signal(SlotState::default()),
            day: create_rw_signal(SlotState::default()),
        }
    }

    pub fn schedule_state(&self) -> RwSignal<ScheduleSlot> {
        self.schedule
    }

    pub fn day_state(&self) -> RwSignal<DaySlot> {
        self.day
    }

    /// Attendance logged on `date` (`YYYY-MM-DD`), if the range holds it.
    pub fn attendance_on(&self, date: NaiveDate) -> Option<Attendance> {
        let key = date.to_string();
        self.schedule.with(|state| {
            state
                .data
                .as_ref()
                .and_then(|cached| cached.value.attendance.get(&key).cloned())
        })
    }

    pub fn schedule_on(&self, date: NaiveDate) -> Option<Schedule> {
        let key = date.to_string();
        self.schedule.with(|state| {
            state
                .data
                .as_ref()
                .and_then(|cached| cached.value.schedule.get(&key).cloned())
        })
    }

    /// Loads attendance and schedules for a range. Data cached for the same
    /// range is reused unless `refresh` is set.
    pub async fn fetch(
        &self,
        query: AttendanceQuery,
        refresh: bool,
    ) -> Result<FetchStatus, ApiError> {
        let key = query.clone();
        fetch_slot(
            self.schedule,
            refresh,
            |cached| cached.key == query,
            || self.api.crud().get_with::<AttendanceSchedule, _>(&query),
            |value| Keyed { key, value },
        )
        .await
    }

    pub async fn fetch_day(&self, date: NaiveDate, refresh: bool) -> Result<FetchStatus, ApiError> {
        fetch_slot(
            self.day,
            refresh,
            |cached| cached.key == date,
            || self.api.get_by_date(date),
            |value| Keyed { key: date, value },
        )
        .await
    }

    pub fn reset(&self) {
        reset_slot(self.schedule);
        reset_slot(self.day);
    }
}
