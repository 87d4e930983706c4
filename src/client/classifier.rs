use http::{HeaderMap, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::value::JsonValue;

/// Response exactly as the transport saw it.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// `None` when the transport could not report a status.
    pub status: Option<u16>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self { status: Some(status), headers, body: body.into() }
    }
}

/// Outcome of reading the response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    /// No body, or the body was never read (404).
    Empty,
    Parsed(JsonValue),
    /// Non-empty body that is not JSON. Degrades to "no result".
    Unparsable,
}

impl ParsedBody {
    pub fn value(&self) -> Option<&JsonValue> {
        match self {
            ParsedBody::Parsed(value) => Some(value),
            ParsedBody::Empty | ParsedBody::Unparsable => None,
        }
    }

    pub fn into_value(self) -> Option<JsonValue> {
        match self {
            ParsedBody::Parsed(value) => Some(value),
            ParsedBody::Empty | ParsedBody::Unparsable => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypedResponse {
    pub status_code: u16,
    pub result: ParsedBody,
    pub headers: HeaderMap,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions {
    /// Turn string values that look like dates into [`JsonValue::Date`].
    pub deserialize_dates: bool,
}

/// Non-success HTTP status.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
    pub status_code: u16,
    pub result: Option<JsonValue>,
}

impl ClientError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self { message: message.into(), status_code, result: None }
    }
}

/// Map a raw response to a typed success or a [`ClientError`].
///
/// 404 is a success with no result; the body is not read and headers are not
/// kept. Any status outside 200..=299 (including a missing status, read as 0)
/// is a failure. Unparsable bodies never fail on their own.
pub fn classify(
    raw: RawResponse,
    options: &ClassifyOptions,
) -> Result<TypedResponse, ClientError> {
    let status_code = raw.status.unwrap_or(0);

    if status_code == StatusCode::NOT_FOUND.as_u16() {
        debug!(status_code, "token endpoint returned not found");
        return Ok(TypedResponse {
            status_code,
            result: ParsedBody::Empty,
            headers: HeaderMap::new(),
        });
    }

    let result = parse_body(&raw.body, options);
    let headers = raw.headers;

    if !is_success(status_code) {
        let message = error_message(&result, &raw.body, status_code);
        debug!(status_code, %message, "token endpoint request failed");
        return Err(ClientError {
            message,
            status_code,
            result: result.into_value(),
        });
    }

    Ok(TypedResponse { status_code, result, headers })
}

fn is_success(status_code: u16) -> bool {
    (200..=299).contains(&status_code)
}

fn parse_body(body: &str, options: &ClassifyOptions) -> ParsedBody {
    if body.is_empty() {
        return ParsedBody::Empty;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ParsedBody::Parsed(JsonValue::from_json(value, options.deserialize_dates)),
        Err(e) => {
            warn!("Body is not valid JSON: {}", e);
            ParsedBody::Unparsable
        }
    }
}

/// Truthy `message` field of the body, else the raw body, else a generic
/// message. Non-string messages are rendered as JSON text.
fn error_message(result: &ParsedBody, body: &str, status_code: u16) -> String {
    let from_body = result
        .value()
        .and_then(|value| value.get("message"))
        .filter(|message| message.is_truthy());

    match from_body {
        Some(JsonValue::String(message)) => message.clone(),
        Some(JsonValue::Date(date)) => date.to_rfc3339(),
        Some(message) => message.to_json().to_string(),
        None if !body.is_empty() => body.to_owned(),
        None => format!("Failed request: ({})", status_code),
    }
}
