use leptos::*;

use super::slot::FetchStatus;
use crate::api::{
    models::{AttendanceRequest, AttendanceRequestPayload},
    ApiEnvelope, ApiError, AttendanceRequestApi, ListParams, PaginationMeta,
};

pub const LOAD_ERROR: &str = "Unable to load attendance requests.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceRequestsState {
    pub items: Option<Vec<AttendanceRequest>>,
    pub meta: Option<PaginationMeta>,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
    /// Bumped by `reset`; page loads started before it are dropped.
    pub generation: u64,
}

impl AttendanceRequestsState {
    fn busy(&self) -> bool {
        self.loading || self.loading_more
    }
}

/// Optional status and type constraints. An unset field matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFilter<'a> {
    pub status: Option<&'a str>,
    pub request_type: Option<&'a str>,
}

impl<'a> RequestFilter<'a> {
    pub fn status(status: &'a str) -> Self {
        Self {
            status: Some(status),
            request_type: None,
        }
    }

    pub fn request_type(request_type: &'a str) -> Self {
        Self {
            status: None,
            request_type: Some(request_type),
        }
    }

    pub fn with_status(mut self, status: &'a str) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_request_type(mut self, request_type: &'a str) -> Self {
        self.request_type = Some(request_type);
        self
    }

    pub fn matches(&self, request: &AttendanceRequest) -> bool {
        self.status
            .map_or(true, |status| normalize_status(&request.status) == normalize_status(status))
            && self.request_type.map_or(true, |request_type| {
                normalize_type(&request.request_type) == normalize_type(request_type)
            })
    }
}

/// Paged list of the employee's attendance requests.
#[derive(Debug, Clone)]
pub struct AttendanceRequestsStore {
    api: AttendanceRequestApi,
    state: RwSignal<AttendanceRequestsState>,
}

impl AttendanceRequestsStore {
    pub fn new(api: AttendanceRequestApi) -> Self {
        Self {
            api,
            state: create_rw_signal(AttendanceRequestsState::default()),
        }
    }

    pub fn state(&self) -> RwSignal<AttendanceRequestsState> {
        self.state
    }

    /// Loads one page. `append` extends the current list, otherwise it is replaced.
    pub async fn fetch_page(&self, page: u32, append: bool) -> Result<FetchStatus, ApiError> {
        if self.state.with_untracked(AttendanceRequestsState::busy) {
            log::debug!("attendance requests already loading, page {} skipped", page);
            return Ok(FetchStatus::InFlight);
        }

        let appending = append && page > 1;
        let generation = self.state.with_untracked(|state| state.generation);
        self.state.update(|state| {
            if appending {
                state.loading_more = true;
            } else {
                state.loading = true;
            }
            state.error = None;
        });

        let result = self.api.crud().list(Some(&ListParams::page(page))).await;
        if self.state.with_untracked(|state| state.generation) != generation {
            log::debug!("attendance requests reset while loading page {}, response dropped", page);
            return result.map(|_| FetchStatus::Superseded);
        }
        match result {
            Ok(ApiEnvelope::Success(success)) => {
                self.state.update(|state| {
                    match (&mut state.items, append) {
                        (Some(items), true) => items.extend(success.data),
                        (items, _) => *items = Some(success.data),
                    }
                    state.meta = success.meta;
                    state.loading = false;
                    state.loading_more = false;
                });
                Ok(FetchStatus::Loaded)
            }
            Ok(ApiEnvelope::Failure(failure)) => {
                log::error!("attendance requests page {} rejected: {}", page, failure.summary());
                self.finish_with_error();
                Ok(FetchStatus::Rejected(failure))
            }
            Err(error) => {
                log::error!("attendance requests page {} failed: {}", page, error);
                self.finish_with_error();
                Err(error)
            }
        }
    }

    fn finish_with_error(&self) {
        self.state.update(|state| {
            state.loading = false;
            state.loading_more = false;
            state.error = Some(LOAD_ERROR.to_string());
        });
    }

    /// First page, reusing what is already loaded unless `refresh` is set.
    pub async fn fetch(&self, refresh: bool) -> Result<FetchStatus, ApiError> {
        if !refresh && self.state.with_untracked(|state| state.items.is_some()) {
            return Ok(FetchStatus::Cached);
        }
        self.fetch_page(1, false).await
    }

    pub async fn refresh(&self) -> Result<FetchStatus, ApiError> {
        self.fetch_page(1, false).await
    }

    /// Appends the next page when the last known page is not the final one.
    pub async fn load_more(&self) -> Result<FetchStatus, ApiError> {
        let next = self.state.with_untracked(|state| {
            state
                .meta
                .as_ref()
                .filter(|meta| meta.has_more())
                .map(|meta| meta.current_page + 1)
        });
        match next {
            Some(page) => self.fetch_page(page, true).await,
            None => Ok(FetchStatus::Cached),
        }
    }

    pub fn has_more(&self) -> bool {
        self.state
            .with(|state| state.meta.as_ref().is_some_and(PaginationMeta::has_more))
    }

    /// Loaded requests matching the given status and type. `None` matches any.
    pub fn get_by_status_and_type(
        &self,
        status: Option<&str>,
        request_type: Option<&str>,
    ) -> Vec<AttendanceRequest> {
        self.get_by(RequestFilter {
            status,
            request_type,
        })
    }

    pub fn get_by(&self, filter: RequestFilter<'_>) -> Vec<AttendanceRequest> {
        self.state
            .with(|state| filter_requests(state.items.as_deref().unwrap_or(&[]), filter))
    }

    pub fn pending_requests(&self) -> Vec<AttendanceRequest> {
        self.get_by(RequestFilter::status("pending"))
    }

    /// Files a request and, once the server confirms it, puts it at the top of the list.
    pub async fn create(
        &self,
        payload: &AttendanceRequestPayload,
    ) -> Result<ApiEnvelope<AttendanceRequest>, ApiError> {
        let envelope = self.api.crud().create(payload).await?;
        if let Some(created) = envelope.data() {
            self.state.update(|state| {
                if let Some(items) = &mut state.items {
                    items.insert(0, created.clone());
                }
            });
        }
        Ok(envelope)
    }

    pub fn reset(&self) {
        self.state.update(|state| {
            *state = AttendanceRequestsState {
                generation: state.generation.wrapping_add(1),
                ..AttendanceRequestsState::default()
            };
        });
    }
}

fn normalize_status(status: &str) -> String {
    status.trim().to_lowercase()
}

fn normalize_type(request_type: &str) -> String {
    request_type.trim().to_uppercase()
}

/// Requests accepted by `filter`, ignoring case and padding.
pub fn filter_requests(
    requests: &[AttendanceRequest],
    filter: RequestFilter<'_>,
) -> Vec<AttendanceRequest> {
    requests
        .iter()
        .filter(|request| filter.matches(request))
        .cloned()
        .collect()
}

#[cfg(test)]
fn sample_request(id: u64, status: &str, request_type: &str) -> AttendanceRequest {
    AttendanceRequest {
        id,
        employee_id: 7,
        request_type: request_type.into(),
        att_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        destination: None,
        purpose: None,
        logs: None,
        remarks: None,
        status: status.into(),
        approver_id: None,
        submitted_by: None,
        approved_at: None,
        rejected_at: None,
        decision_notes: None,
        employee: None,
        approver: None,
        submitter: None,
        created_at: None,
        updated_at: None,
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::models::RequestType;
    use crate::api::test_support::authed_client;
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    const PATH: &str = "/api/portal/attendance/requests";

    fn request_json(id: u64) -> Value {
        json!({
            "id": id,
            "employee_id": 7,
            "request_type": "OT",
            "att_date": "2025-03-04",
            "status": "pending"
        })
    }

    fn page_body(ids: &[u64], page: u32, last_page: u32) -> Value {
        json!({
            "success": true,
            "data": ids.iter().map(|id| request_json(*id)).collect::<Vec<_>>(),
            "meta": {
                "current_page": page,
                "last_page": last_page,
                "per_page": 2,
                "total": 4,
                "from": 1,
                "to": 2,
                "path": PATH
            }
        })
    }

    async fn mock_pages(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("page[number]", "1");
                then.status(200).json_body(page_body(&[1, 2], 1, 2));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("page[number]", "2");
                then.status(200).json_body(page_body(&[3, 4], 2, 2));
            })
            .await;
    }

    fn ids(store: &AttendanceRequestsStore) -> Vec<u64> {
        store
            .state()
            .get_untracked()
            .items
            .unwrap_or_default()
            .iter()
            .map(|request| request.id)
            .collect()
    }

    #[tokio::test]
    async fn append_mode_extends_the_list() {
        let server = MockServer::start_async().await;
        mock_pages(&server).await;

        let runtime = create_runtime();
        let (client, _auth) = authed_client(&server);
        let store = AttendanceRequestsStore::new(AttendanceRequestApi::new(client));

        store.fetch_page(1, false).await.unwrap();
        assert!(store.has_more());
        store.fetch_page(2, true).await.unwrap();

        assert_eq!(ids(&store), [1, 2, 3, 4]);
        assert!(!store.has_more());
        runtime.dispose();
    }

    #[tokio::test]
    async fn non_append_mode_replaces_the_list() {
        let server = MockServer::start_async().await;
        mock_pages(&server).await;

        let runtime = create_runtime();
        let (client, _auth) = authed_client(&server);
        let store = AttendanceRequestsStore::new(AttendanceRequestApi::new(client));

        store.fetch_page(1, false).await.unwrap();
        store.fetch_page(2, false).await.unwrap();

        assert_eq!(ids(&store), [3, 4]);
        runtime.dispose();
    }

    #[tokio::test]
    async fn fetch_reuses_loaded_page_and_load_more_appends() {
        let server = MockServer::start_async().await;
        mock_pages(&server).await;

        let runtime = create_runtime();
        let (client, _auth) = authed_client(&server);
        let store = AttendanceRequestsStore::new(AttendanceRequestApi::new(client));

        assert_eq!(store.fetch(false).await.unwrap(), FetchStatus::Loaded);
        assert_eq!(store.fetch(false).await.unwrap(), FetchStatus::Cached);
        assert_eq!(store.load_more().await.unwrap(), FetchStatus::Loaded);
        assert_eq!(store.load_more().await.unwrap(), FetchStatus::Cached);
        assert_eq!(ids(&store), [1, 2, 3, 4]);

        assert_eq!(store.refresh().await.unwrap(), FetchStatus::Loaded);
        assert_eq!(ids(&store), [1, 2]);
        runtime.dispose();
    }

    #[tokio::test]
    async fn concurrent_page_loads_are_guarded() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200).json_body(page_body(&[1, 2], 1, 1));
            })
            .await;

        let runtime = create_runtime();
        let (client, _auth) = authed_client(&server);
        let store = AttendanceRequestsStore::new(AttendanceRequestApi::new(client));

        let (first, second) = futures::join!(store.fetch_page(1, false), store.fetch_page(1, false));

        assert_eq!(first.unwrap(), FetchStatus::Loaded);
        assert_eq!(second.unwrap(), FetchStatus::InFlight);
        assert_eq!(mock.hits_async().await, 1);
        runtime.dispose();
    }

    #[tokio::test]
    async fn reset_while_loading_drops_the_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200)
                    .delay(std::time::Duration::from_millis(200))
                    .json_body(page_body(&[1, 2], 1, 2));
            })
            .await;

        let runtime = create_runtime();
        let (client, _auth) = authed_client(&server);
        let store = AttendanceRequestsStore::new(AttendanceRequestApi::new(client));

        let (stale, _) = futures::join!(store.fetch_page(1, false), async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            store.reset();
        });

        assert_eq!(stale.unwrap(), FetchStatus::Superseded);
        let state = store.state().get_untracked();
        assert!(state.items.is_none());
        assert!(state.meta.is_none());
        assert!(!state.loading);
        assert!(!store.has_more());
        assert_eq!(mock.hits_async().await, 1);
        runtime.dispose();
    }

    #[tokio::test]
    async fn failed_load_records_error_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(500).json_body(json!({ "message": "Server Error" }));
            })
            .await;

        let runtime = create_runtime();
        let (client, _auth) = authed_client(&server);
        let store = AttendanceRequestsStore::new(AttendanceRequestApi::new(client));

        assert!(store.fetch(false).await.is_err());
        let state = store.state().get_untracked();
        assert_eq!(state.error.as_deref(), Some(LOAD_ERROR));
        assert!(!state.loading);
        assert!(state.items.is_none());
        runtime.dispose();
    }

    #[tokio::test]
    async fn create_prepends_confirmed_request() {
        let server = MockServer::start_async().await;
        mock_pages(&server).await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(201).json_body(json!({ "success": true, "data": request_json(9) }));
            })
            .await;

        let runtime = create_runtime();
        let (client, _auth) = authed_client(&server);
        let store = AttendanceRequestsStore::new(AttendanceRequestApi::new(client));
        store.fetch_page(1, false).await.unwrap();

        let payload = AttendanceRequestPayload {
            request_type: RequestType::Overtime,
            att_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 4),
            destination: None,
            purpose: Some("inventory".into()),
            remarks: None,
            logs: None,
        };
        let envelope = store.create(&payload).await.unwrap();

        assert!(envelope.is_success());
        assert_eq!(ids(&store), [9, 1, 2]);
        assert_eq!(post.hits_async().await, 1);
        runtime.dispose();
    }

    #[tokio::test]
    async fn helpers_read_from_loaded_items() {
        let server = MockServer::start_async().await;
        let runtime = create_runtime();
        let (client, _auth) = authed_client(&server);
        let store = AttendanceRequestsStore::new(AttendanceRequestApi::new(client));
        assert!(store.pending_requests().is_empty());

        store.state().update(|state| {
            state.items = Some(vec![
                sample_request(1, "Pending", "OT"),
                sample_request(2, "approved", "OB"),
                sample_request(3, "pending", "COA"),
            ]);
        });

        let pending: Vec<u64> = store.pending_requests().iter().map(|r| r.id).collect();
        assert_eq!(pending, [1, 3]);
        assert_eq!(store.get_by_status_and_type(Some("APPROVED"), Some("ob"))[0].id, 2);
        assert_eq!(store.get_by_status_and_type(None, Some("OT")).len(), 1);
        assert_eq!(store.get_by_status_and_type(None, None).len(), 3);
        assert_eq!(store.get_by(RequestFilter::request_type("COA"))[0].id, 3);

        store.reset();
        assert!(store.state().get_untracked().items.is_none());
        runtime.dispose();
    }
}
