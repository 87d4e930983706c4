use std::path::Path;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::{ClientSettings, RetryConfig};

/// Load and validate client settings from a YAML file.
///
/// `${VAR}` and `${VAR:default}` references are expanded from the
/// environment before parsing.
pub async fn load_settings(path: &Path) -> Result<ClientSettings> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read settings file {}", path.display()))?;

    let expanded = expand_env_vars(&content)?;
    parse_settings(&expanded)
}

pub fn parse_settings(content: &str) -> Result<ClientSettings> {
    let settings: ClientSettings = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse settings error: {}", e))
        .map_err(|e| anyhow!(format!("Invalid settings format: {}", e)))?;

    debug!("validation settings ...");
    validate_settings(&settings)
        .map_err(|errors| anyhow!("settings are not valid: {}", errors.join("; ")))?;

    Ok(settings)
}

/// Returns every issue found, not just the first.
pub fn validate_settings(settings: &ClientSettings) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_retry("retry", &settings.retry, &mut errors);

    if settings.timeout_ms == Some(0) {
        errors.push("timeout_ms must be > 0 when set".to_string());
    }
    if settings.user_agent.trim().is_empty() {
        errors.push("user_agent cannot be empty".to_string());
    }
    if let Some(logging) = &settings.logging {
        match logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => errors.push(format!("logging.level '{}' is not supported", other)),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for e in &errors {
            error!("{}", e);
        }
        Err(errors)
    }
}

fn validate_retry(path: &str, retry: &RetryConfig, errors: &mut Vec<String>) {
    if retry.max_delay_ms < retry.base_delay_ms {
        errors.push(format!(
            "{}.max_delay_ms ({}) must be >= base_delay_ms ({})",
            path, retry.max_delay_ms, retry.base_delay_ms
        ));
    }
}

fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.to_string())
}
