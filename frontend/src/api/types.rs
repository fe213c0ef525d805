use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Per-field validation messages, in the order the server reported them.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::request_failed(error.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub from: u32,
    pub last_page: u32,
    pub path: String,
    pub per_page: u32,
    pub to: u32,
    pub total: u32,
}

impl PaginationMeta {
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiSuccess<T> {
    pub data: T,
    pub meta: Option<PaginationMeta>,
}

/// The `success: false` half of the envelope. Returned as data, never thrown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiFailure {
    pub message: Option<String>,
    pub errors: ValidationErrors,
}

impl ApiFailure {
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Best single line for a banner: the server message, else the first field error.
    pub fn summary(&self) -> String {
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return message.to_string();
        }
        self.errors
            .values()
            .flat_map(|messages| messages.first())
            .next()
            .cloned()
            .unwrap_or_else(|| "Request was rejected".to_string())
    }

    fn from_body(mut body: Map<String, Value>) -> Result<Self, ApiError> {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let errors = match body.remove("errors") {
            None | Some(Value::Null) => ValidationErrors::new(),
            Some(raw) => serde_json::from_value(raw)
                .map_err(|e| ApiError::decode(format!("invalid validation errors: {}", e)))?,
        };
        Ok(Self { message, errors })
    }
}

/// Response envelope returned by every HRIS endpoint, discriminated on `success`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEnvelope<T> {
    Success(ApiSuccess<T>),
    Failure(ApiFailure),
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        let Value::Object(mut body) = value else {
            return Err(ApiError::decode("response body is not a JSON object"));
        };
        match body.get("success").and_then(Value::as_bool) {
            Some(true) => {
                // A missing `data` decodes as null so optional payloads come back as None.
                let data = body.remove("data").unwrap_or(Value::Null);
                let data = serde_json::from_value(data)
                    .map_err(|e| ApiError::decode(format!("invalid data: {}", e)))?;
                let meta = match body.remove("meta") {
                    None | Some(Value::Null) => None,
                    Some(raw) => Some(
                        serde_json::from_value(raw)
                            .map_err(|e| ApiError::decode(format!("invalid meta: {}", e)))?,
                    ),
                };
                Ok(Self::Success(ApiSuccess { data, meta }))
            }
            Some(false) => Ok(Self::Failure(ApiFailure::from_body(body)?)),
            None => Err(ApiError::decode(
                "response envelope is missing the `success` flag",
            )),
        }
    }
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(success) => Some(&success.data),
            Self::Failure(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(success) => Some(success.data),
            Self::Failure(_) => None,
        }
    }

    pub fn meta(&self) -> Option<&PaginationMeta> {
        match self {
            Self::Success(success) => success.meta.as_ref(),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ApiFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

/// True when a body explicitly declares itself a failure envelope.
pub(crate) fn is_failure_body(value: &Value) -> bool {
    value.get("success").and_then(Value::as_bool) == Some(false)
}
