// Missing runtime inputs must fail before anything goes on the wire.

use std::sync::atomic::Ordering;

use http::StatusCode;
use serial_test::serial;

use crate::client::get_id_token;
use crate::error::OidcError;
use crate::tests::common::{spawn_counting_endpoint, token_url};
use crate::utils::constants::{ENV_ID_TOKEN_REQUEST_TOKEN, ENV_ID_TOKEN_REQUEST_URL};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_missing_inputs_fail_without_network_calls() {
    let (handle, addr, counter) =
        spawn_counting_endpoint(|_| (StatusCode::OK, r#"{"value":"abc123"}"#.to_owned())).await;
    let url = token_url(&format!("http://{}", addr));

    let cases: [(Option<&str>, Option<&str>, &str); 5] = [
        (None, Some("bearer"), ENV_ID_TOKEN_REQUEST_URL),
        (Some(url.as_str()), None, ENV_ID_TOKEN_REQUEST_TOKEN),
        (None, None, ENV_ID_TOKEN_REQUEST_URL),
        (Some(""), Some("bearer"), ENV_ID_TOKEN_REQUEST_URL),
        (Some(url.as_str()), Some(""), ENV_ID_TOKEN_REQUEST_TOKEN),
    ];

    for (request_url, request_token, missing) in cases {
        set_or_remove(ENV_ID_TOKEN_REQUEST_URL, request_url);
        set_or_remove(ENV_ID_TOKEN_REQUEST_TOKEN, request_token);

        let err = get_id_token(Some("sigstore"), None).await.unwrap_err();
        match err.kind() {
            OidcError::Configuration(name) => assert_eq!(*name, missing),
            other => panic!("expected configuration error, got {:?}", other),
        }
        assert_eq!(err.to_string(), format!("Error message: Unable to get {} env variable", missing));
    }

    std::env::remove_var(ENV_ID_TOKEN_REQUEST_URL);
    std::env::remove_var(ENV_ID_TOKEN_REQUEST_TOKEN);

    assert_eq!(counter.load(Ordering::SeqCst), 0, "no request may reach the endpoint");
    handle.abort();
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(value) => std::env::set_var(key, value),
        None => std::env::remove_var(key),
    }
}
