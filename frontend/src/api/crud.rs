use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use super::{
    client::{ApiClient, FetchOptions},
    types::{ApiEnvelope, ApiError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageParam {
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParam>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filter: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<bool>,
}

impl ListParams {
    pub fn page(number: u32) -> Self {
        Self {
            page: Some(PageParam { number, size: None }),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        let number = self.page.map(|page| page.number).unwrap_or(1);
        self.page = Some(PageParam {
            number,
            size: Some(size),
        });
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// Typed CRUD operations over one resource base path.
///
/// Holds no state besides the client and path; caching is left to the stores.
pub struct CrudApi<T> {
    client: ApiClient,
    base_path: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for CrudApi<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_path: self.base_path.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for CrudApi<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudApi")
            .field("base_path", &self.base_path)
            .finish()
    }
}

impl<T: DeserializeOwned> CrudApi<T> {
    pub fn new(client: ApiClient, base_path: impl Into<String>) -> Self {
        Self {
            client,
            base_path: base_path.into().trim_end_matches('/').to_string(),
            _entity: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn item_path(&self, id: u64) -> String {
        format!("{}/{}", self.base_path, id)
    }

    pub async fn list(&self, params: Option<&ListParams>) -> Result<ApiEnvelope<Vec<T>>, ApiError> {
        let mut options = FetchOptions::get();
        if let Some(params) = params {
            options = options.with_query(params)?;
        }
        self.client.fetch(&self.base_path, options).await
    }

    /// GETs the base path, adding `latest=true` only when asked.
    pub async fn get<R: DeserializeOwned>(&self, latest: bool) -> Result<ApiEnvelope<R>, ApiError> {
        let mut options = FetchOptions::get();
        if latest {
            options = options.with_query(&json!({ "latest": true }))?;
        }
        self.client.fetch(&self.base_path, options).await
    }

    pub async fn get_with<R, Q>(&self, query: &Q) -> Result<ApiEnvelope<R>, ApiError>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let options = FetchOptions::get().with_query(query)?;
        self.client.fetch(&self.base_path, options).await
    }

    pub async fn create<P: Serialize + ?Sized>(&self, entity: &P) -> Result<ApiEnvelope<T>, ApiError> {
        self.client
            .fetch(&self.base_path, FetchOptions::post(entity)?)
            .await
    }

    pub async fn update<P: Serialize + ?Sized>(
        &self,
        id: u64,
        patch: &P,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        self.client
            .fetch(&self.item_path(id), FetchOptions::put(patch)?)
            .await
    }

    /// DELETEs one record. Servers answer with the deleted record or a bare marker.
    pub async fn remove(&self, id: u64) -> Result<ApiEnvelope<Option<T>>, ApiError> {
        self.client
            .fetch(&self.item_path(id), FetchOptions::delete())
            .await
    }
}
