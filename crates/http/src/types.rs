//! Common types used by the typed clients and the dashboard crates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role as issued by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Supervisor,
    Admin,
    /// Role string this client does not recognize; kept verbatim so it
    /// round-trips instead of failing deserialization
    Unknown(String),
}

impl Role {
    /// Wire representation of the role
    pub fn as_str(&self) -> &str {
        match self {
            Self::Student => "STUDENT",
            Self::Supervisor => "SUPERVISOR",
            Self::Admin => "ADMIN",
            Self::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "STUDENT" => Self::Student,
            "SUPERVISOR" => Self::Supervisor,
            "ADMIN" => Self::Admin,
            _ => Self::Unknown(value),
        })
    }
}

/// Account as returned by `/auth/me` and the login endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Response envelope used by every PMS endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, turning a refusal into the server's own words
    pub fn into_data(self) -> Result<T, String> {
        if !self.success {
            return Err(self.rejection());
        }
        self.data
            .ok_or_else(|| "response missing payload".to_string())
    }

    /// Check the envelope flag, ignoring any payload
    pub fn ensure_success(self) -> Result<(), String> {
        if self.success {
            Ok(())
        } else {
            Err(self.rejection())
        }
    }

    fn rejection(self) -> String {
        self.error
            .or(self.message)
            .unwrap_or_else(|| "request rejected by server".to_string())
    }
}

/// OTP request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRequest {
    pub email: String,
}

/// Outcome of an OTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    /// A one-time code was emailed to the address
    OtpSent,
    /// The address belongs to an administrator; password login is required
    Admin,
}

/// `data` payload answering an OTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub status: ChallengeStatus,
    pub email: String,
}

/// Admin password login body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// OTP verification body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// `data` payload issued on successful login or token refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}
