//! Request and response models.
//!
//! Discord resources themselves (guilds, channels, roles, members, messages,
//! webhooks) are not modelled: upstream payloads pass through the proxy as
//! opaque JSON. Only the inputs the routes validate and the few shapes the
//! service produces itself live here.

pub mod api;
pub mod audit;
pub mod discord;

pub use api::*;
pub use audit::*;
pub use discord::*;
