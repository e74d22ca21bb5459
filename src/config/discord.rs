//! Configuration for the upstream Discord REST client.

use super::{env_parse, env_string};

/// Default Discord REST endpoint; every proxied route targets API v10.
pub const DISCORD_API_BASE_URL: &str = "https://discord.com/api/v10";

/// Configuration for [`DiscordClient`](crate::services::DiscordClient)
#[derive(Clone, Debug)]
pub struct DiscordClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Timeout for read operations (GET), in seconds
    pub read_timeout_seconds: u64,

    /// Timeout for write operations (POST, PUT, PATCH, DELETE), in seconds
    pub write_timeout_seconds: u64,

    /// Connection timeout, in seconds
    pub connect_timeout_seconds: u64,

    /// User-Agent sent upstream. Discord asks bots to identify as `DiscordBot (url, version)`.
    pub user_agent: String,
}

impl Default for DiscordClientConfig {
    fn default() -> Self {
        Self {
            base_url: DISCORD_API_BASE_URL.to_string(),
            read_timeout_seconds: 10,
            write_timeout_seconds: 15,
            connect_timeout_seconds: 3,
            user_agent: default_user_agent(),
        }
    }
}

impl DiscordClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env_string("DISCORD_API_BASE_URL", &defaults.base_url),
            read_timeout_seconds: env_parse("DISCORD_READ_TIMEOUT", defaults.read_timeout_seconds),
            write_timeout_seconds: env_parse("DISCORD_WRITE_TIMEOUT", defaults.write_timeout_seconds),
            connect_timeout_seconds: env_parse(
                "DISCORD_CONNECT_TIMEOUT",
                defaults.connect_timeout_seconds,
            ),
            user_agent: env_string("DISCORD_USER_AGENT", &defaults.user_agent),
        }
    }
}

fn default_user_agent() -> String {
    format!("DiscordBot (bot-dashboard, {})", env!("CARGO_PKG_VERSION"))
}
