use http::header::{ACCEPT, AUTHORIZATION};
use http::{HeaderMap, HeaderValue, Method};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::json;
use tracing::debug;

use crate::client::classifier::{classify, ClassifyOptions, TypedResponse};
use crate::client::token::IdToken;
use crate::client::transport::{HttpTransport, OutgoingRequest, ReqwestTransport};
use crate::client::value::JsonValue;
use crate::config::runtime::RuntimeConfig;
use crate::config::settings::ClientSettings;
use crate::error::{IdTokenError, OidcError};
use crate::utils::constants::{AUDIENCE_QUERY_PARAM, TOKEN_FIELD};

/// Characters left as is when encoding a query component; everything else
/// is percent-encoded (same set as `encodeURIComponent`).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Parameters of a single token request. Built per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    base_url: String,
    audience: Option<String>,
    subject_claims: Option<Vec<String>>,
}

impl TokenRequest {
    pub fn new(base_url: &str, audience: Option<&str>, subject_claims: Option<&[String]>) -> Self {
        Self {
            base_url: base_url.to_owned(),
            audience: audience.filter(|a| !a.is_empty()).map(str::to_owned),
            subject_claims: subject_claims.map(<[String]>::to_vec),
        }
    }

    /// Base url, plus `&audience=<encoded>` when an audience is set.
    ///
    /// The base url already carries a query string, so the audience is always
    /// joined with `&`.
    pub fn url(&self) -> String {
        match &self.audience {
            Some(audience) => format!(
                "{}&{}={}",
                self.base_url,
                AUDIENCE_QUERY_PARAM,
                utf8_percent_encode(audience, QUERY_COMPONENT)
            ),
            None => self.base_url.clone(),
        }
    }

    /// `{"include_claim_keys": [...]}`, or `{}` without subject claims.
    pub fn body(&self) -> String {
        match &self.subject_claims {
            Some(claims) => json!({ "include_claim_keys": claims }).to_string(),
            None => json!({}).to_string(),
        }
    }
}

/// Requests ID tokens from the runtime's issuance endpoint.
#[derive(Debug, Clone)]
pub struct TokenRequester<T = ReqwestTransport> {
    config: RuntimeConfig,
    transport: T,
    options: ClassifyOptions,
}

impl TokenRequester<ReqwestTransport> {
    /// Requester over a reqwest transport, retries enabled per `settings`.
    pub fn with_settings(
        config: RuntimeConfig,
        settings: &ClientSettings,
    ) -> Result<Self, OidcError> {
        let transport = ReqwestTransport::new(settings)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: HttpTransport> TokenRequester<T> {
    pub fn new(config: RuntimeConfig, transport: T) -> Self {
        Self { config, transport, options: ClassifyOptions::default() }
    }

    pub fn with_options(mut self, options: ClassifyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a token. Every failure comes back as `Error message: <reason>`.
    pub async fn request_id_token(
        &self,
        audience: Option<&str>,
        subject_claims: Option<&[String]>,
    ) -> Result<IdToken, IdTokenError> {
        self.fetch_id_token(audience, subject_claims)
            .await
            .map_err(IdTokenError::from)
    }

    /// Wire form of the request `request_id_token` would send.
    pub fn build_request(
        &self,
        audience: Option<&str>,
        subject_claims: Option<&[String]>,
    ) -> OutgoingRequest {
        let token_request = TokenRequest::new(self.config.request_url(), audience, subject_claims);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.config.authorization().clone());

        OutgoingRequest {
            method: Method::GET,
            url: token_request.url(),
            headers,
            body: token_request.body(),
        }
    }

    async fn fetch_id_token(
        &self,
        audience: Option<&str>,
        subject_claims: Option<&[String]>,
    ) -> Result<IdToken, OidcError> {
        let request = self.build_request(audience, subject_claims);
        debug!(url = %request.url, "ID token url");

        let raw = self.transport.execute(&request).await?;
        let response = classify(raw, &self.options)?;
        extract_token(response)
    }
}

fn extract_token(response: TypedResponse) -> Result<IdToken, OidcError> {
    response
        .result
        .value()
        .and_then(|result| result.get(TOKEN_FIELD))
        .and_then(JsonValue::as_str)
        .and_then(IdToken::new)
        .ok_or(OidcError::MissingToken)
}
