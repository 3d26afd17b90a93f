// ============================
// crates/backend-lib/src/htpasswd/error.rs
// ============================
use thiserror::Error;

/// Failures raised while loading or querying the credential table
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,

    #[error("unsupported hash")]
    UnsupportedHash,

    #[error("not the hash of the given password")]
    PasswordMismatch,

    #[error("malformed hash: {0}")]
    MalformedHash(String),

    #[error("failed to read credential source: {0}")]
    SourceRead(#[from] std::io::Error),
}

impl AuthError {
    /// Whether this error came from loading the table rather than a query
    pub fn is_load_error(&self) -> bool {
        matches!(self, AuthError::SourceRead(_))
    }
}
