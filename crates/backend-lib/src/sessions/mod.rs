// ============================
// crates/backend-lib/src/sessions/mod.rs
// ============================
//! Server-side sessions keyed by an opaque cookie token.
mod session;
pub mod store;

pub use session::Session;
pub use store::{SessionLookup, SessionStore, DEFAULT_COOKIE_NAME, DEFAULT_SESSION_TIMEOUT};

/// Session key holding the authenticated username
pub const USERNAME_KEY: &str = "username";

/// Session key holding the path to return to after login
pub const REDIRECT_URI_KEY: &str = "redirect_uri";
