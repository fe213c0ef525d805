//! Data layer of the HRIS employee portal: an authenticated API client with
//! typed resource endpoints, and reactive entity stores on top of it.

pub mod api;
pub mod config;
pub mod state;

pub use api::{ApiClient, ApiEnvelope, ApiError, AuthContext};
pub use state::{provide_portal_stores, use_portal_stores, PortalStores};

/// Routes `log` output and panics to the browser console. A no-op off wasm,
/// where the host application installs its own logger.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Debug).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }
        log::info!("HRIS portal data layer ready, API at {}", config::api_base_url());
    }
}
