use std::rc::Rc;

use futures::lock::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};

use super::{
    auth::AuthContext,
    query,
    types::{is_failure_body, ApiEnvelope, ApiError},
};
use crate::config;

pub const API_VERSION: &str = "1.0";
const API_VERSION_HEADER: &str = "api-version";

/// Outbound request options. Built fresh per call.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub query: Option<Map<String, Value>>,
    pub headers: Vec<(String, String)>,
}

impl FetchOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    pub fn post<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        Self::with_method(Method::POST).with_body(body)
    }

    pub fn put<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        Self::with_method(Method::PUT).with_body(body)
    }

    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ApiError> {
        self.query = Some(query::to_query_map(params)?);
        Ok(self)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Result of one send, tagged so the retry decision is a plain match.
enum Attempt {
    Delivered(Response),
    Unauthorized,
}

impl Attempt {
    fn classify(response: Response) -> Self {
        if response.status() == StatusCode::UNAUTHORIZED {
            Self::Unauthorized
        } else {
            Self::Delivered(response)
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Rc<dyn AuthContext>,
    refresh_gate: Rc<Mutex<()>>,
}

// Custom Debug so the auth context never ends up in logs.
impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.auth.access_token().is_some())
            .finish()
    }
}

impl ApiClient {
    /// Builds a client against the configured HRIS base URL.
    pub fn new(auth: Rc<dyn AuthContext>) -> Self {
        Self::new_with_base_url(config::api_base_url(), auth)
    }

    pub fn new_with_base_url(base_url: impl Into<String>, auth: Rc<dyn AuthContext>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            refresh_gate: Rc::new(Mutex::new(())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a path against the base URL; absolute URLs pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Performs one authenticated JSON request and parses the response envelope.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        options: FetchOptions,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let FetchOptions {
            method,
            body,
            query,
            headers,
        } = options;

        // The query goes into the URL only; the transport never sees it again.
        let url = match &query {
            Some(params) => query::append_query(&self.url(path), params),
            None => self.url(path),
        };
        let body = body.map(|value| value.to_string());
        log::debug!("{} {}", method, url);

        let response = self
            .send_with_refresh(|token| {
                let mut request = self
                    .client
                    .request(method.clone(), url.as_str())
                    .headers(json_headers(&headers, token)?);
                if let Some(body) = &body {
                    request = request.body(body.clone());
                }
                Ok(request)
            })
            .await?;

        Self::map_envelope(response).await
    }

    /// Posts multipart form data with bearer auth. `Content-Type` is left to the
    /// transport so it can add the boundary; the response is returned unparsed.
    pub async fn send_multipart<F>(&self, path: &str, form: F) -> Result<Response, ApiError>
    where
        F: Fn() -> Result<Form, ApiError>,
    {
        let url = self.url(path);
        log::debug!("POST {} (multipart)", url);
        self.send_with_refresh(|token| {
            let mut headers = HeaderMap::new();
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
            headers.insert(AUTHORIZATION, bearer(token)?);
            Ok(self.client.post(url.as_str()).headers(headers).multipart(form()?))
        })
        .await
    }

    /// Sends the request built by `build`, refreshing the token at most once.
    ///
    /// `build` receives the bearer token and is called again for the retry, so
    /// every attempt gets fresh headers from the same base options.
    pub async fn send_with_refresh<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&str) -> Result<RequestBuilder, ApiError>,
    {
        let token = match self.auth.access_token() {
            Some(token) => token,
            None => self.refresh_token(None).await?,
        };

        match Attempt::classify(build(&token)?.send().await?) {
            Attempt::Delivered(response) => Ok(response),
            Attempt::Unauthorized => {
                log::warn!("access token rejected with 401, refreshing before a single retry");
                let fresh = self.refresh_token(Some(&token)).await?;
                // Whatever the retry returns is surfaced as-is, a second 401 included.
                Ok(build(&fresh)?.send().await?)
            }
        }
    }

    /// Obtains a usable token, sharing one refresh between concurrent callers.
    ///
    /// `stale` is the token the caller already knows to be unusable (`None` when
    /// no token was held).
    async fn refresh_token(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        // Another caller may have refreshed while this one waited on the gate.
        if let Some(current) = self.auth.access_token() {
            if stale != Some(current.as_str()) {
                log::debug!("token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        if !self.auth.refresh_access_token().await {
            log::warn!("token refresh failed");
            return Err(ApiError::Unauthenticated);
        }
        self.auth.access_token().ok_or(ApiError::Unauthenticated)
    }

    async fn map_envelope<T: DeserializeOwned>(
        response: Response,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            if text.trim().is_empty() {
                return ApiEnvelope::from_value(json!({ "success": true }));
            }
            let value: Value = serde_json::from_str(&text)?;
            return ApiEnvelope::from_value(value);
        }

        let parsed = serde_json::from_str::<Value>(&text).ok();
        match parsed {
            Some(value) if is_failure_body(&value) => ApiEnvelope::from_value(value),
            Some(value) => {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or(text);
                Err(ApiError::http(status.as_u16(), message))
            }
            None => {
                let message = if text.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    text
                };
                Err(ApiError::http(status.as_u16(), message))
            }
        }
    }
}

fn bearer(token: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ApiError::invalid_request("Invalid token format"))
}

/// Defaults, then caller headers (which may override defaults), then the
/// bearer token last so callers cannot replace it.
fn json_headers(extra: &[(String, String)], token: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(API_VERSION_HEADER),
        HeaderValue::from_static(API_VERSION),
    );
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::invalid_request(format!("invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::invalid_request(format!("invalid value for header {}", name)))?;
        headers.insert(name, value);
    }
    headers.insert(AUTHORIZATION, bearer(token)?);
    Ok(headers)
}
