//! Custom hooks for the application

pub mod use_login_flow;

pub use use_login_flow::{LoginFlowHandle, use_login_flow};
