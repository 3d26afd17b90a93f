// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
pub const AUTH_SUCCEEDED: &str = "auth.succeeded";
pub const AUTH_FAILED: &str = "auth.failed";
