//! Configuration structures and loading utilities.
//!
//! Every structure here has a `from_env()` constructor that reads its
//! environment variables and falls back to the `Default` values.

pub mod discord;
pub mod security;
pub mod server;
pub mod telemetry;

pub use discord::*;
pub use security::*;
pub use server::*;
pub use telemetry::*;

use std::{env, str::FromStr};

/// Everything needed to assemble the application, loaded once at startup.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub discord: DiscordClientConfig,
    pub rate_limit: RateLimitConfig,
    pub security: SecurityHeadersConfig,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            discord: DiscordClientConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            security: SecurityHeadersConfig::from_env(),
            metrics: MetricsConfig::from_env(),
        }
    }
}

/// Parse an environment variable, falling back to `default` when it is unset or malformed.
pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a boolean flag; only a case-insensitive "true" enables it.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

pub(crate) fn env_string(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
