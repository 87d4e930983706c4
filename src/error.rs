use thiserror::Error;

use crate::client::classifier::ClientError;

pub const MISSING_TOKEN_MESSAGE: &str = "Response json body do not have ID Token field";

/// Every way a token request can fail before it reaches the caller.
#[derive(Debug, Error)]
pub enum OidcError {
    /// A required runtime input (endpoint url or bearer token) is absent or empty.
    #[error("Unable to get {0} env variable")]
    Configuration(&'static str),

    /// A runtime input is present but cannot be put on the wire.
    #[error("Invalid {0} env variable: {1}")]
    InvalidConfiguration(&'static str, String),

    /// Network-level failure, after the transport gave up retrying.
    #[error("{0}")]
    Transport(String),

    /// The endpoint answered with a status above 299.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Success status, but no usable `value` field in the body.
    #[error("{}", MISSING_TOKEN_MESSAGE)]
    MissingToken,
}

impl OidcError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, OidcError::Configuration(_) | OidcError::InvalidConfiguration(..))
    }
}

impl From<reqwest::Error> for OidcError {
    fn from(err: reqwest::Error) -> Self {
        OidcError::Transport(err.to_string())
    }
}

/// Uniform error returned from the public entry points.
#[derive(Debug, Error)]
#[error("Error message: {kind}")]
pub struct IdTokenError {
    kind: OidcError,
}

impl IdTokenError {
    pub fn kind(&self) -> &OidcError {
        &self.kind
    }

    pub fn into_kind(self) -> OidcError {
        self.kind
    }
}

impl From<OidcError> for IdTokenError {
    fn from(kind: OidcError) -> Self {
        Self { kind }
    }
}
