//! PMS wire types and typed HTTP clients
//!
//! Shared request/response types for the login protocol plus reqwest-backed
//! clients usable from both native code and the WASM dashboard.

pub mod types;

#[cfg(feature = "client")]
pub mod client;
