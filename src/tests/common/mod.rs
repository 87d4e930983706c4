// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::routing::get;
use http::{HeaderMap, StatusCode};

use crate::client::{HttpTransport, OutgoingRequest, RawResponse, TokenRequester};
use crate::config::runtime::RuntimeConfig;
use crate::config::settings::{ClientSettings, RetryConfig};
use crate::error::OidcError;

pub const TOKEN_PATH: &str = "/_apis/actions/idtoken";
pub const REQUEST_TOKEN: &str = "runtime-bearer-token";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Token endpoint answering every call with the status/body produced by
/// `respond(call_index)`. Returns the shared call counter.
pub async fn spawn_counting_endpoint<F>(respond: F) -> (JoinHandle<()>, SocketAddr, Arc<AtomicUsize>)
where
    F: Fn(usize) -> (StatusCode, String) + Clone + Send + Sync + 'static,
{
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();
    let router = Router::new().route(TOKEN_PATH, get(move || {
        let c = counter_clone.clone();
        let respond = respond.clone();
        async move {
            let n = c.fetch_add(1, Ordering::SeqCst);
            respond(n)
        }
    }));
    let (handle, addr) = spawn_axum(router).await;
    (handle, addr, counter)
}

pub fn token_url(base: &str) -> String {
    format!("{}{}?api-version=2.0", base, TOKEN_PATH)
}

pub fn runtime_config(url: &str) -> RuntimeConfig {
    RuntimeConfig::new(Some(url.to_owned()), Some(REQUEST_TOKEN.to_owned())).expect("runtime config")
}

/// Fast retries so the retry tests stay quick.
pub fn fast_retry_settings(max_retries: u32) -> ClientSettings {
    ClientSettings {
        retry: RetryConfig { enabled: true, max_retries, base_delay_ms: 1, max_delay_ms: 5 },
        timeout_ms: Some(5_000),
        ..ClientSettings::default()
    }
}

pub fn http_requester(url: &str, settings: &ClientSettings) -> TokenRequester {
    TokenRequester::with_settings(runtime_config(url), settings).expect("requester")
}

/// Transport that never touches the network: records every request and
/// answers with a fixed response.
#[derive(Debug)]
pub struct RecordingTransport {
    status: u16,
    body: String,
    fail_with: Option<String>,
    requests: Mutex<Vec<OutgoingRequest>>,
}

impl RecordingTransport {
    pub fn responding(status: u16, body: &str) -> Self {
        Self { status, body: body.to_owned(), fail_with: None, requests: Mutex::new(Vec::new()) }
    }

    pub fn failing(message: &str) -> Self {
        Self { status: 0, body: String::new(), fail_with: Some(message.to_owned()), requests: Mutex::new(Vec::new()) }
    }

    pub fn requests(&self) -> Vec<OutgoingRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for RecordingTransport {
    async fn execute(&self, request: &OutgoingRequest) -> Result<RawResponse, OidcError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.fail_with {
            Some(message) => Err(OidcError::Transport(message.clone())),
            None => Ok(RawResponse::new(self.status, HeaderMap::new(), self.body.clone())),
        }
    }
}
