// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the `CareBridge` backend.

pub mod auth;
pub mod rate_limit;

pub use auth::{require_auth, CurrentUser};
pub use rate_limit::rate_limit;
