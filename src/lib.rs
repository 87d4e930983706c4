//! # Actions OIDC Client Library
//!
//! Requests short-lived OIDC ID tokens from a CI runtime's token issuance
//! endpoint on behalf of the running job.
//!
//! Modules:
//! - `config`: runtime inputs and client settings
//! - `client`: request building, transport and response classification
//! - `resilience`: retry with exponential backoff
//! - `error`: error taxonomy and the uniform top-level error

pub mod client;
pub mod config;
pub mod error;
pub mod resilience;
pub mod utils;
#[cfg(test)]
mod tests;

pub use crate::client::{get_id_token, IdToken, TokenRequester};
pub use crate::config::runtime::RuntimeConfig;
pub use crate::error::{IdTokenError, OidcError};
