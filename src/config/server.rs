//! Listener and rate limiting configuration.

use std::{env, path::Path};

use super::{env_parse, env_string};

/// Address the HTTP server binds to
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `HOST` and `PORT`.
    ///
    /// Without `HOST`, the server listens on localhost, or on all interfaces
    /// when running inside a container.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let default_host = if is_container_environment() {
            "0.0.0.0"
        } else {
            defaults.host.as_str()
        };

        Self {
            host: env_string("HOST", default_host),
            port: env_parse("PORT", defaults.port),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Kubernetes sets `KUBERNETES_SERVICE_HOST`; Docker creates `/.dockerenv`.
fn is_container_environment() -> bool {
    env::var_os("KUBERNETES_SERVICE_HOST").is_some()
        || env::var_os("DOCKER_CONTAINER").is_some()
        || Path::new("/.dockerenv").exists()
}

/// Configuration for the per-client rate limiter in front of the Discord routes
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Requests allowed per client within one window
    pub requests_per_window: usize,
    /// Window length in seconds
    pub period_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 100,
            period_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            requests_per_window: env_parse("RATE_LIMIT_RPM", defaults.requests_per_window),
            period_seconds: env_parse("RATE_LIMIT_PERIOD", defaults.period_seconds),
        }
    }
}
