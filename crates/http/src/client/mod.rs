//! Typed PMS API clients

pub mod auth_typed;
pub mod error;
pub mod typed;

pub use error::ClientError;
pub use typed::{AuthenticatedPmsClient, PublicPmsClient, TypedClientBuilder};
