use std::fmt;

use http::HeaderValue;

use crate::error::OidcError;
use crate::utils::constants::{ENV_ID_TOKEN_REQUEST_TOKEN, ENV_ID_TOKEN_REQUEST_URL};

/// Endpoint url and bearer token issued to the job by the CI runtime.
///
/// Read-only once built; both values are guaranteed non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    request_url: String,
    request_token: String,
    authorization: HeaderValue,
}

impl RuntimeConfig {
    /// Url is checked before token. Empty strings count as absent.
    pub fn new(
        request_url: Option<String>,
        request_token: Option<String>,
    ) -> Result<Self, OidcError> {
        let request_url =
            non_empty(request_url).ok_or(OidcError::Configuration(ENV_ID_TOKEN_REQUEST_URL))?;
        let request_token =
            non_empty(request_token).ok_or(OidcError::Configuration(ENV_ID_TOKEN_REQUEST_TOKEN))?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", request_token))
            .map_err(|e| {
                OidcError::InvalidConfiguration(ENV_ID_TOKEN_REQUEST_TOKEN, e.to_string())
            })?;
        authorization.set_sensitive(true);

        Ok(Self { request_url, request_token, authorization })
    }

    pub fn from_env() -> Result<Self, OidcError> {
        Self::new(
            std::env::var(ENV_ID_TOKEN_REQUEST_URL).ok(),
            std::env::var(ENV_ID_TOKEN_REQUEST_TOKEN).ok(),
        )
    }

    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    pub fn request_token(&self) -> &str {
        &self.request_token
    }

    /// `Bearer <token>`, marked sensitive.
    pub fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("request_url", &self.request_url)
            .field("request_token", &"***")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
