//! Authentication API service

use crate::client::{create_authenticated_client, create_public_client, set_auth_token};
use pms_http::types::{AuthPayload, OtpChallenge, User};

/// Authentication API service
#[derive(Clone)]
pub struct AuthApiService;

impl AuthApiService {
    /// Create a new auth API service
    pub fn new() -> Self {
        Self
    }
}

impl Default for AuthApiService {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthApiService {
    /// Request a one-time passcode for the given email
    pub async fn request_otp(&self, email: String) -> Result<OtpChallenge, String> {
        let client = create_public_client().map_err(|e| format!("Failed to get client: {e}"))?;

        client
            .request_otp(email)
            .await
            .map_err(|e| e.user_message())
    }

    /// Sign an administrator in with email and password
    pub async fn admin_login(
        &self,
        email: String,
        password: String,
    ) -> Result<AuthPayload, String> {
        let client = create_public_client().map_err(|e| format!("Failed to get client: {e}"))?;

        let payload = client
            .admin_login(email, password)
            .await
            .map_err(|e| e.user_message())?;

        // Arm the authenticated client before anyone can observe the login
        set_auth_token(Some(&payload.token)).map_err(|e| format!("Failed to store token: {e}"))?;
        Ok(payload)
    }

    /// Exchange a one-time passcode for a session
    pub async fn verify_otp(&self, email: String, otp: String) -> Result<AuthPayload, String> {
        let client = create_public_client().map_err(|e| format!("Failed to get client: {e}"))?;

        let payload = client
            .verify_otp(email, otp)
            .await
            .map_err(|e| e.user_message())?;

        set_auth_token(Some(&payload.token)).map_err(|e| format!("Failed to store token: {e}"))?;
        Ok(payload)
    }

    /// Fetch the account behind the current token
    pub async fn current_user(&self) -> Result<User, String> {
        let client = create_authenticated_client()
            .map_err(|e| format!("Failed to get client: {e}"))?
            .ok_or_else(|| "Not authenticated".to_string())?;

        client.current_user().await.map_err(|e| e.user_message())
    }

    /// Issue a fresh token for the current session
    pub async fn refresh_token(&self) -> Result<AuthPayload, String> {
        let client = create_authenticated_client()
            .map_err(|e| format!("Failed to get client: {e}"))?
            .ok_or_else(|| "Not authenticated".to_string())?;

        let payload = client.refresh_token().await.map_err(|e| e.user_message())?;

        set_auth_token(Some(&payload.token)).map_err(|e| format!("Failed to store token: {e}"))?;
        Ok(payload)
    }

    /// Sign out. The server call is best effort; the local token is
    /// dropped no matter what the server says.
    pub async fn logout(&self) {
        match create_authenticated_client() {
            Ok(Some(client)) => {
                if let Err(error) = client.logout().await {
                    tracing::debug!("server-side logout failed: {error}");
                }
            }
            Ok(None) => {}
            Err(error) => {
                tracing::debug!("logout skipped, no client available: {error}");
            }
        }

        let _ = set_auth_token(None);
    }
}
