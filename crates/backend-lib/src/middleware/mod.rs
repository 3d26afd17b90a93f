// crates/backend-lib/src/middleware/mod.rs

//! Authentication gates for the `Gatehouse` server.

pub mod basic_auth;
pub mod session;

pub use basic_auth::require_basic_auth;
pub use session::require_session;
