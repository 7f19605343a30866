pub mod auth;
pub mod client;
pub mod client_wrapper;
pub mod components;
pub mod config;
pub mod hooks;
pub mod services;

pub use auth::context::{AuthProvider, SessionHandle};
pub use client::{create_authenticated_client, create_public_client, set_auth_token};
pub use components::Spinner;
pub use config::AuthConfig;
