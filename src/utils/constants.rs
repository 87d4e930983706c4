//! Shared constants and invariants

// Runtime inputs
pub const ENV_ID_TOKEN_REQUEST_URL: &str = "ACTIONS_ID_TOKEN_REQUEST_URL";
pub const ENV_ID_TOKEN_REQUEST_TOKEN: &str = "ACTIONS_ID_TOKEN_REQUEST_TOKEN";

pub const DEFAULT_USER_AGENT: &str = "actions/oidc-client";

// Retry defaults: delay doubles from 10ms, capped at 5 * 2^10 ms
pub const DEFAULT_MAX_RETRIES: u32 = 10;
pub const DEFAULT_BASE_DELAY_MS: u64 = 10;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5120;

/// Statuses the transport treats as transient
pub const RETRYABLE_STATUS_CODES: [u16; 3] = [502, 503, 504];

// Wire format
pub const AUDIENCE_QUERY_PARAM: &str = "audience";
pub const TOKEN_FIELD: &str = "value";
