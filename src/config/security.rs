//! Security headers configuration.

use super::{env_flag, env_parse, env_string};

/// Content-Security-Policy allowing the embedded dashboard and Discord CDN avatars, nothing else.
pub const DEFAULT_CSP: &str = "default-src 'self'; img-src 'self' https://cdn.discordapp.com; \
     style-src 'self' 'unsafe-inline'; object-src 'none'; frame-ancestors 'none'";

/// Configuration for security headers middleware
#[derive(Clone, Debug)]
pub struct SecurityHeadersConfig {
    pub csp_enabled: bool,
    pub csp_directives: String,
    pub hsts_enabled: bool,
    pub hsts_max_age: u32,
    pub frame_options: String,
    pub content_type_options: bool,
    pub xss_protection: bool,
    pub referrer_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            csp_enabled: true,
            csp_directives: DEFAULT_CSP.to_string(),
            hsts_enabled: true,
            hsts_max_age: 31_536_000, // 1 year
            frame_options: "DENY".to_string(),
            content_type_options: true,
            xss_protection: true,
            referrer_policy: "no-referrer".to_string(),
        }
    }
}

impl SecurityHeadersConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            csp_enabled: env_flag("SECURITY_CSP_ENABLED", defaults.csp_enabled),
            csp_directives: env_string("CSP_DIRECTIVES", &defaults.csp_directives),
            hsts_enabled: env_flag("HSTS_ENABLED", defaults.hsts_enabled),
            hsts_max_age: env_parse("HSTS_MAX_AGE", defaults.hsts_max_age),
            frame_options: env_string("X_FRAME_OPTIONS", &defaults.frame_options),
            content_type_options: env_flag("X_CONTENT_TYPE_OPTIONS", defaults.content_type_options),
            xss_protection: env_flag("X_XSS_PROTECTION", defaults.xss_protection),
            referrer_policy: env_string("REFERRER_POLICY", &defaults.referrer_policy),
        }
    }
}
