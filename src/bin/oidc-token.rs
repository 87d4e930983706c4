use std::path::PathBuf;

use actions_oidc_client::config::loader;
use actions_oidc_client::config::runtime::RuntimeConfig;
use actions_oidc_client::config::settings::ClientSettings;
use actions_oidc_client::utils::constants::{ENV_ID_TOKEN_REQUEST_TOKEN, ENV_ID_TOKEN_REQUEST_URL};
use actions_oidc_client::utils::logging::{self, LogLevel};
use actions_oidc_client::{IdTokenError, TokenRequester};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

/// Request an OIDC ID token for the running CI job and print it to stdout.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Audience the token is issued for
    #[arg(short, long)]
    audience: Option<String>,
    /// Claim keys to include in the token subject; repeatable
    #[arg(long = "subject-claim", value_name = "CLAIM")]
    subject_claims: Vec<String>,
    #[arg(long, env = ENV_ID_TOKEN_REQUEST_URL, hide_env_values = true)]
    request_url: Option<String>,
    #[arg(long, env = ENV_ID_TOKEN_REQUEST_TOKEN, hide_env_values = true)]
    request_token: Option<String>,
    /// Optional YAML settings file
    #[arg(short, long, env = "OIDC_CLIENT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Override the number of retries on transient failures
    #[arg(long)]
    max_retries: Option<u32>,
    /// Make a single attempt only
    #[arg(long)]
    no_retry: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args and settings
    // -------------------------------

    let args = Args::parse();
    let mut settings = match &args.config {
        Some(path) => loader::load_settings(path).await?,
        None => ClientSettings::default(),
    };
    if let Some(max_retries) = args.max_retries {
        settings.retry.max_retries = max_retries;
    }
    if args.no_retry {
        settings.retry.enabled = false;
    }
    logging::run(&settings, args.log_level);

    // -------------------------------
    // 2. Resolve runtime inputs and build requester
    // -------------------------------

    let requester = RuntimeConfig::new(args.request_url, args.request_token)
        .and_then(|config| TokenRequester::with_settings(config, &settings))
        .map_err(IdTokenError::from)
        .context("failed to prepare token request")?;

    // -------------------------------
    // 3. Request the token
    // -------------------------------

    let subject_claims =
        (!args.subject_claims.is_empty()).then_some(args.subject_claims.as_slice());
    info!(audience = ?args.audience, "requesting ID token");
    let token = requester
        .request_id_token(args.audience.as_deref(), subject_claims)
        .await?;

    println!("{}", token.as_str());
    Ok(())
}
