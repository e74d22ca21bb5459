//! Tracing subscriber setup and log redaction.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, TelemetryConfig};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured default filter.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .try_init()?,
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .try_init()?,
    }

    info!(
        service_name = %config.service_name,
        service_version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        format = ?config.format,
        "Tracing initialized"
    );

    Ok(())
}

/// Credential patterns removed before anything reaches the logs
static SENSITIVE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // JSON fields carrying credentials
        (
            r#"(?i)"(token|authorization|password|secret)"\s*:\s*"[^"]*""#,
            r#""$1": "[REDACTED]""#,
        ),
        // Authorization header values
        (r"\b(Bot|Bearer)\s+[A-Za-z0-9._\-]+", "$1 [REDACTED]"),
        // Webhook execute URLs embed the webhook token as the last segment
        (
            r"(?i)(/webhooks/\d+/)[A-Za-z0-9._\-]+",
            "${1}[REDACTED]",
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Redact bot tokens, webhook tokens and credential fields from log output
pub fn redact_sensitive_data(input: &str) -> String {
    SENSITIVE_PATTERNS
        .iter()
        .fold(input.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}
