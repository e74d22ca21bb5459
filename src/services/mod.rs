//! Service layer: the Discord REST client, metrics collection and rate limiting.

pub mod discord_client;
pub mod metrics;
pub mod rate_limit;

pub use discord_client::*;
pub use metrics::*;
pub use rate_limit::*;
