use async_trait::async_trait;

/// The auth store that owns the portal's bearer token.
///
/// Token acquisition (login, cookies, OAuth) lives outside this crate. The API
/// client only reads the current token and asks for a refresh when the token is
/// missing or the server rejects it with a 401.
#[async_trait(?Send)]
pub trait AuthContext {
    /// The bearer token currently held, if any.
    fn access_token(&self) -> Option<String>;

    /// Refreshes the held token in place. Returns whether the refresh succeeded.
    async fn refresh_access_token(&self) -> bool;
}
