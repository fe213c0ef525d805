use std::future::Future;

use leptos::*;

use crate::api::{ApiEnvelope, ApiError, ApiFailure};

/// One cached payload plus its loading and error flags.
///
/// `generation` changes on every reset. A fetch that started under an older
/// generation leaves the slot alone when it completes.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
}

impl<T> Default for SlotState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl<T> SlotState<T> {
    pub fn is_populated(&self) -> bool {
        self.data.is_some()
    }

    /// Back to empty. Pending fetches are orphaned.
    pub fn clear(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        };
    }
}

/// Empties `slot` and orphans whatever fetch is still running against it.
pub fn reset_slot<T: 'static>(slot: RwSignal<SlotState<T>>) {
    slot.update(SlotState::clear);
}

/// A payload remembered together with the query that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<K, T> {
    pub key: K,
    pub value: T,
}

/// What a store fetch ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    /// The slot already held fresh data; nothing was sent.
    Cached,
    /// Another fetch for the same slot was pending; nothing was sent.
    InFlight,
    Loaded,
    /// The slot was reset while the request was pending; the answer was dropped.
    Superseded,
    /// The server answered `success: false`; the slot kept its previous data.
    Rejected(ApiFailure),
}

impl FetchStatus {
    pub fn hit_network(&self) -> bool {
        matches!(self, Self::Loaded | Self::Superseded | Self::Rejected(_))
    }
}

/// Runs the cache-or-refetch policy shared by every single-slot store.
///
/// `is_fresh` decides whether populated data still answers the current call;
/// `into_slot` turns the envelope payload into what the slot stores.
pub async fn fetch_slot<T, R, Fut>(
    slot: RwSignal<SlotState<T>>,
    refresh: bool,
    is_fresh: impl FnOnce(&T) -> bool,
    request: impl FnOnce() -> Fut,
    into_slot: impl FnOnce(R) -> T,
) -> Result<FetchStatus, ApiError>
where
    T: 'static,
    Fut: Future<Output = Result<ApiEnvelope<R>, ApiError>>,
{
    let (fresh, in_flight) = slot.with_untracked(|state| {
        (state.data.as_ref().is_some_and(is_fresh), state.loading)
    });
    if fresh && !refresh {
        return Ok(FetchStatus::Cached);
    }
    if in_flight {
        log::debug!("fetch skipped, slot already loading");
        return Ok(FetchStatus::InFlight);
    }

    let generation = slot.with_untracked(|state| state.generation);
    slot.update(|state| {
        state.loading = true;
        state.error = None;
    });
    let current = move || slot.with_untracked(|state| state.generation) == generation;

    match request().await {
        Ok(_) if !current() => {
            log::debug!("slot reset while loading, response dropped");
            Ok(FetchStatus::Superseded)
        }
        Ok(ApiEnvelope::Success(success)) => {
            let value = into_slot(success.data);
            slot.update(|state| {
                state.data = Some(value);
                state.loading = false;
            });
            Ok(FetchStatus::Loaded)
        }
        Ok(ApiEnvelope::Failure(failure)) => {
            let summary = failure.summary();
            log::error!("fetch rejected: {}", summary);
            slot.update(|state| {
                state.loading = false;
                state.error = Some(summary);
            });
            Ok(FetchStatus::Rejected(failure))
        }
        Err(error) => {
            log::error!("fetch failed: {}", error);
            if current() {
                slot.update(|state| {
                    state.loading = false;
                    state.error = Some(error.to_string());
                });
            }
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiSuccess, ValidationErrors};
    use futures::executor::block_on;
    use std::cell::Cell;

    fn with_runtime<T>(test: impl FnOnce() -> T) -> T {
        let runtime = create_runtime();
        let result = test();
        runtime.dispose();
        result
    }

    fn success(value: u32) -> Result<ApiEnvelope<u32>, ApiError> {
        Ok(ApiEnvelope::Success(ApiSuccess {
            data: value,
            meta: None,
        }))
    }

    #[test]
    fn populated_slot_is_reused_unless_refreshed() {
        with_runtime(|| {
            let slot = create_rw_signal(SlotState::<u32>::default());
            let calls = Cell::new(0);
            let request = || {
                calls.set(calls.get() + 1);
                async { success(7) }
            };

            let first = block_on(fetch_slot(slot, false, |_| true, request, |v| v)).unwrap();
            let second = block_on(fetch_slot(slot, false, |_| true, request, |v| v)).unwrap();
            let forced = block_on(fetch_slot(slot, true, |_| true, request, |v| v)).unwrap();

            assert_eq!(first, FetchStatus::Loaded);
            assert_eq!(second, FetchStatus::Cached);
            assert_eq!(forced, FetchStatus::Loaded);
            assert_eq!(calls.get(), 2);
            assert_eq!(slot.get_untracked().data, Some(7));
        });
    }

    #[test]
    fn stale_key_triggers_a_fetch() {
        with_runtime(|| {
            let slot = create_rw_signal(SlotState {
                data: Some(Keyed { key: 1, value: 10 }),
                ..SlotState::default()
            });
            let status = block_on(fetch_slot(
                slot,
                false,
                |cached: &Keyed<u32, u32>| cached.key == 2,
                || async { success(20) },
                |value| Keyed { key: 2, value },
            ))
            .unwrap();

            assert_eq!(status, FetchStatus::Loaded);
            assert_eq!(slot.get_untracked().data, Some(Keyed { key: 2, value: 20 }));
        });
    }

    #[test]
    fn loading_slot_skips_duplicate_fetch() {
        with_runtime(|| {
            let slot = create_rw_signal(SlotState::<u32> {
                loading: true,
                ..SlotState::default()
            });
            let status = block_on(fetch_slot(
                slot,
                false,
                |_| true,
                || async { success(1) },
                |v| v,
            ))
            .unwrap();

            assert_eq!(status, FetchStatus::InFlight);
            assert!(!status.hit_network());
            assert!(slot.get_untracked().data.is_none());
        });
    }

    #[test]
    fn failures_keep_previous_data_and_record_error() {
        with_runtime(|| {
            let slot = create_rw_signal(SlotState {
                data: Some(3u32),
                ..SlotState::default()
            });
            let failure = ApiFailure {
                message: Some("Payroll is locked.".into()),
                errors: ValidationErrors::new(),
            };
            let rejected = failure.clone();
            let status = block_on(fetch_slot(
                slot,
                true,
                |_| true,
                move || async move { Ok(ApiEnvelope::<u32>::Failure(rejected)) },
                |v| v,
            ))
            .unwrap();
            assert_eq!(status, FetchStatus::Rejected(failure));

            let err = block_on(fetch_slot(
                slot,
                true,
                |_| true,
                || async { Err::<ApiEnvelope<u32>, _>(ApiError::http(500, "Server Error")) },
                |v| v,
            ))
            .unwrap_err();
            assert_eq!(err.status(), Some(500));

            let state = slot.get_untracked();
            assert_eq!(state.data, Some(3));
            assert!(!state.loading);
            assert_eq!(state.error.as_deref(), Some("HTTP 500: Server Error"));
        });
    }

    #[test]
    fn reset_during_request_drops_the_late_answer() {
        with_runtime(|| {
            let slot = create_rw_signal(SlotState {
                data: Some(1u32),
                ..SlotState::default()
            });
            let status = block_on(fetch_slot(
                slot,
                true,
                |_| true,
                move || async move {
                    reset_slot(slot);
                    success(2)
                },
                |v| v,
            ))
            .unwrap();

            assert_eq!(status, FetchStatus::Superseded);
            let state = slot.get_untracked();
            assert!(state.data.is_none());
            assert!(!state.loading);
            assert_eq!(state.generation, 1);
        });
    }

    #[test]
    fn reset_during_request_keeps_late_errors_out_of_the_slot() {
        with_runtime(|| {
            let slot = create_rw_signal(SlotState::<u32>::default());
            let err = block_on(fetch_slot(
                slot,
                false,
                |_| true,
                move || async move {
                    reset_slot(slot);
                    Err::<ApiEnvelope<u32>, _>(ApiError::http(500, "Server Error"))
                },
                |v| v,
            ))
            .unwrap_err();

            assert_eq!(err.status(), Some(500));
            let state = slot.get_untracked();
            assert!(state.error.is_none());
            assert!(!state.loading);
        });
    }
}
