//! Frontend configuration

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Local storage key for the persisted account
    pub const USER_KEY: &'static str = "user";

    /// Local storage key for the raw session token
    pub const TOKEN_KEY: &'static str = "auth_token";
}
