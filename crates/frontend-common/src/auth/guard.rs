//! Route guard evaluation
//!
//! Pure decision logic for protected routes. The router component wraps
//! this with the actual redirects so the rules stay testable on their own.

use pms_http::types::{Role, User};

/// What a protected route should do with the current session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the protected content
    Allow,
    /// No session held, send to the login page
    RedirectLogin,
    /// Session held but the wrong role, send to the root redirector
    RedirectRoot,
}

/// Evaluate a guard for the current session.
///
/// The session check comes first: an unauthenticated visitor is sent to
/// login even when the route also names a role. Only a fully held session
/// (user and token) counts as authenticated.
pub fn evaluate(
    user: Option<&User>,
    token: Option<&str>,
    required_role: Option<&Role>,
) -> GuardOutcome {
    let Some(user) = user else {
        return GuardOutcome::RedirectLogin;
    };
    if token.is_none() {
        return GuardOutcome::RedirectLogin;
    }

    match required_role {
        Some(role) if user.role != *role => GuardOutcome::RedirectRoot,
        _ => GuardOutcome::Allow,
    }
}
