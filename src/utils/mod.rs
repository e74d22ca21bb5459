//! Request inspection helpers shared by handlers and middleware.

pub mod http;
pub mod route;

pub use http::*;
pub use route::*;
