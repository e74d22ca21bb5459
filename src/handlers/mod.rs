//! HTTP request handlers for API endpoints.
//!
//! The Discord proxy routes share the plumbing in [`proxy`]; the rest serve
//! the dashboard itself and the operational endpoints.

pub mod auth;
pub mod channels;
pub mod dashboard;
pub mod guilds;
pub mod health;
pub mod members;
pub mod messages;
pub mod metrics;
pub mod openapi;
pub mod proxy;
pub mod roles;
pub mod version;
pub mod webhooks;

pub use auth::*;
pub use channels::*;
pub use dashboard::*;
pub use guilds::*;
pub use health::*;
pub use members::*;
pub use messages::*;
pub use metrics::*;
pub use openapi::*;
pub use roles::*;
pub use version::*;
pub use webhooks::*;
