// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_REGISTERED: &str = "auth.registered";
pub const AUTH_LOGIN: &str = "auth.login";
pub const AUTH_LOGIN_FAILED: &str = "auth.login_failed";
pub const TOKEN_ROTATED: &str = "token.rotated";
pub const TOKEN_REVOKED: &str = "token.revoked";
pub const HOSPITAL_CREATED: &str = "hospital.created";
pub const STAFF_ADDED: &str = "staff.added";
pub const STAFF_REMOVED: &str = "staff.removed";
