//! Bot Dashboard - a web administration panel for a Discord bot
//!
//! The service exposes a small JSON API in front of the Discord REST API (v10)
//! and serves a single-page dashboard that uses it. Every proxied route takes
//! the caller's `Authorization` header, validates its inputs, makes one
//! Discord call and answers with a `{"<resource>": ...}` or `{"error": ...}`
//! envelope. No bot token or Discord data is stored.
//!
//! ## Architecture
//!
//! - `models/` - Route inputs, envelopes and audit events
//! - `handlers/` - HTTP handlers, one module per Discord resource
//! - `middleware/` - Security headers, request IDs and metrics
//! - `services/` - Discord client, rate limiting and Prometheus metrics
//! - `utils/` - Request inspection helpers
//! - `config/` - Configuration structures and environment loading
//! - `telemetry` - Tracing setup and log redaction
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::HttpServer;
//! use bot_dashboard::{AppState, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let state = AppState::from_env().map_err(std::io::Error::other)?;
//!     HttpServer::new(move || create_app(state.clone()))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{
    AppConfig, DiscordClientConfig, MetricsConfig, RateLimitConfig, SecurityHeadersConfig,
    ServerConfig, TelemetryConfig,
};
pub use error::{ApiError, StartupError};
pub use handlers::{AppState, create_app, create_openapi_spec};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders};
pub use services::{
    AppMetrics, DiscordClient, DiscordClientError, DiscordClientMetrics, Endpoint,
    SimpleRateLimiter, UpstreamRequest,
};
pub use telemetry::{init_tracing, redact_sensitive_data};
