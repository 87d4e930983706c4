use std::time::Duration;

use http::{HeaderMap, Method};
use reqwest::Client;
use tracing::{debug, warn};

use crate::client::classifier::RawResponse;
use crate::config::settings::ClientSettings;
use crate::error::OidcError;
use crate::resilience::retry::RetrySettings;
use crate::utils::constants::RETRYABLE_STATUS_CODES;

/// Everything that goes on the wire for one token request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

pub trait HttpTransport: Send + Sync {
    fn execute(
        &self,
        request: &OutgoingRequest,
    ) -> impl std::future::Future<Output = Result<RawResponse, OidcError>> + Send;
}

/// reqwest-backed transport with built-in retries.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    retry: RetrySettings,
}

impl ReqwestTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, OidcError> {
        let mut builder = Client::builder().user_agent(settings.user_agent.as_str());
        if let Some(timeout_ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build()?;

        Ok(Self { client, retry: RetrySettings::from_config(&settings.retry) })
    }

    async fn execute_once(&self, request: &OutgoingRequest) -> Result<RawResponse, reqwest::Error> {
        let response = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status, "failed to read response body: {}", e);
                String::new()
            }
        };
        debug!(status, body_len = body.len(), "token endpoint responded");

        Ok(RawResponse { status: Some(status), headers, body })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &OutgoingRequest) -> Result<RawResponse, OidcError> {
        self.retry
            .run_with_retry(move || self.execute_once(request), is_transient)
            .await
            .map_err(OidcError::from)
    }
}

/// Connection-level failures and gateway statuses are worth another try.
/// A request that could not be built, or that hit the redirect limit, is not.
fn is_transient(outcome: &Result<RawResponse, reqwest::Error>) -> bool {
    match outcome {
        Ok(response) => response
            .status
            .is_some_and(|status| RETRYABLE_STATUS_CODES.contains(&status)),
        Err(e) => !(e.is_builder() || e.is_redirect()),
    }
}
