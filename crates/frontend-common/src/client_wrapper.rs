//! Wrapped client that handles session expiry automatically

use pms_http::client::{AuthenticatedPmsClient, error::ClientError};
use pms_http::types::{AuthPayload, User};

/// Wrapper around AuthenticatedPmsClient that reports expired sessions to
/// the global handler before the error reaches the caller
#[derive(Clone)]
pub struct WrappedAuthClient {
    inner: AuthenticatedPmsClient,
}

impl WrappedAuthClient {
    /// Create a new wrapped client
    pub fn new(client: AuthenticatedPmsClient) -> Self {
        Self { inner: client }
    }

    fn notice<T>(result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(error) = &result {
            if error.is_session_expired() {
                crate::auth::expiry::trigger_session_expired();
            }
        }
        result
    }

    /// Execute a request and report session expiry
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        Self::notice(self.inner.execute(request).await)
    }

    /// Create a request builder with the bearer header attached
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, path)
    }

    /// Fetch the account behind the current session token
    pub async fn current_user(&self) -> Result<User, ClientError> {
        Self::notice(self.inner.current_user().await)
    }

    /// Exchange the current token for a fresh one
    pub async fn refresh_token(&self) -> Result<AuthPayload, ClientError> {
        Self::notice(self.inner.refresh_token().await)
    }

    /// Invalidate the session server-side. A 401 here means the session is
    /// already dead, which is not an expiry event worth announcing.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.inner.logout().await
    }

    /// Get a reference to the inner client (use sparingly - prefer wrapped methods)
    pub fn inner(&self) -> &AuthenticatedPmsClient {
        &self.inner
    }
}
