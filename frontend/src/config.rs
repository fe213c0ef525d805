use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "HRIS_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub hris_api_url: Option<String>,
}

impl RuntimeConfig {
    /// Reads the current configuration. Nothing is cached; every call looks again.
    pub fn from_environment() -> Self {
        Self {
            hris_api_url: snapshot_api_url(),
        }
    }

    pub fn api_base_url(&self) -> String {
        normalize_base_url(self.hris_api_url.as_deref())
    }
}

/// Base URL of the HRIS API without a trailing slash.
pub fn api_base_url() -> String {
    RuntimeConfig::from_environment().api_base_url()
}

fn normalize_base_url(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(target_arch = "wasm32")]
fn snapshot_api_url() -> Option<String> {
    // window.__HRIS_ENV = { HRIS_API_URL: "..." } (env.js) wins over
    // window.__HRIS_CONFIG = { hris_api_url: "..." }.
    read_global("__HRIS_ENV", &[API_URL_ENV, "hris_api_url"])
        .or_else(|| read_global("__HRIS_CONFIG", &["hris_api_url", API_URL_ENV]))
}

#[cfg(target_arch = "wasm32")]
fn read_global(name: &str, keys: &[&str]) -> Option<String> {
    let window = web_sys::window()?;
    let global = js_sys::Reflect::get(&window, &name.into()).ok()?;
    if global.is_undefined() || global.is_null() {
        return None;
    }
    keys.iter().find_map(|key| {
        js_sys::Reflect::get(&global, &(*key).into())
            .ok()
            .and_then(|value| value.as_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn snapshot_api_url() -> Option<String> {
    std::env::var(API_URL_ENV).ok()
}
