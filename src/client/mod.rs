//! Token request client
//!
//! Builds requests against the runtime's token endpoint, runs them through a
//! transport and classifies the responses.

pub mod classifier;
pub mod requester;
pub mod token;
pub mod transport;
pub mod value;

use crate::config::runtime::RuntimeConfig;
use crate::config::settings::ClientSettings;
use crate::error::{IdTokenError, OidcError};

pub use classifier::{
    classify, ClassifyOptions, ClientError, ParsedBody, RawResponse, TypedResponse,
};
pub use requester::{TokenRequest, TokenRequester};
pub use token::IdToken;
pub use transport::{HttpTransport, OutgoingRequest, ReqwestTransport};
pub use value::JsonValue;

/// Fetch an ID token using the runtime inputs from the process environment
/// and default client settings.
pub async fn get_id_token(
    audience: Option<&str>,
    subject_claims: Option<&[String]>,
) -> Result<IdToken, IdTokenError> {
    let requester = default_requester()?;
    requester.request_id_token(audience, subject_claims).await
}

fn default_requester() -> Result<TokenRequester, OidcError> {
    let config = RuntimeConfig::from_env()?;
    TokenRequester::with_settings(config, &ClientSettings::default())
}
