//! Typed login-protocol endpoints

use super::{
    error::ClientError,
    typed::{AuthenticatedPmsClient, PublicPmsClient},
};
use crate::types::{
    AdminLoginRequest, ApiResponse, AuthPayload, OtpChallenge, OtpRequest, User, VerifyOtpRequest,
};

fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> Result<T, ClientError> {
    envelope.into_data().map_err(ClientError::AuthChallenge)
}

/// Login-protocol endpoints for the public client
impl PublicPmsClient {
    /// Ask the server to email a one-time code to the address
    pub async fn request_otp(
        &self,
        email: impl Into<String>,
    ) -> Result<OtpChallenge, ClientError> {
        let body = OtpRequest {
            email: email.into(),
        };
        let req = self
            .request(reqwest::Method::POST, "/auth/request-otp")
            .json(&body);
        let envelope: ApiResponse<OtpChallenge> = self.execute(req).await?;
        unwrap_envelope(envelope)
    }

    /// Password login for administrator accounts
    pub async fn admin_login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthPayload, ClientError> {
        let body = AdminLoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let req = self
            .request(reqwest::Method::POST, "/auth/admin-login")
            .json(&body);
        let envelope: ApiResponse<AuthPayload> = self.execute(req).await?;
        unwrap_envelope(envelope)
    }

    /// Exchange an emailed code for a session token
    pub async fn verify_otp(
        &self,
        email: impl Into<String>,
        otp: impl Into<String>,
    ) -> Result<AuthPayload, ClientError> {
        let body = VerifyOtpRequest {
            email: email.into(),
            otp: otp.into(),
        };
        let req = self
            .request(reqwest::Method::POST, "/auth/verify-otp")
            .json(&body);
        let envelope: ApiResponse<AuthPayload> = self.execute(req).await?;
        unwrap_envelope(envelope)
    }
}

/// Session endpoints for the authenticated client
impl AuthenticatedPmsClient {
    /// Fetch the account behind the current session token
    pub async fn current_user(&self) -> Result<User, ClientError> {
        let req = self.request(reqwest::Method::GET, "/auth/me");
        let envelope: ApiResponse<User> = self.execute(req).await?;
        unwrap_envelope(envelope)
    }

    /// Invalidate the session server-side
    pub async fn logout(&self) -> Result<(), ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/auth/logout")
            .json(&serde_json::json!({}));
        let envelope: ApiResponse<serde_json::Value> = self.execute(req).await?;
        envelope.ensure_success().map_err(ClientError::AuthChallenge)
    }

    /// Exchange the current token for a fresh one
    pub async fn refresh_token(&self) -> Result<AuthPayload, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/auth/refresh-token")
            .json(&serde_json::json!({}));
        let envelope: ApiResponse<AuthPayload> = self.execute(req).await?;
        unwrap_envelope(envelope)
    }
}
