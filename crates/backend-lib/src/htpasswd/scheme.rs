// ============================
// crates/backend-lib/src/htpasswd/scheme.rs
// ============================
//! Stored password hash formats.
use super::AuthError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

/// Marker of the legacy base64 SHA-1 format
pub const SHA_PREFIX: &str = "{SHA}";

/// Marker shared by every bcrypt variant ($2a$, $2b$, $2y$, ...)
pub const BCRYPT_PREFIX: &str = "$2";

const SHA1_DIGEST_LEN: usize = 20;

/// A stored hash, classified once when the credential table is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashScheme {
    /// Full bcrypt hash string, including its `$2x$cost$` header
    Bcrypt(String),
    /// Base64 payload following the `{SHA}` marker
    SaltedSha1(String),
    /// Anything else; never matches
    Unsupported,
}

impl HashScheme {
    /// Classify a stored hash by its prefix
    pub fn parse(stored: &str) -> Self {
        if stored.starts_with(BCRYPT_PREFIX) {
            HashScheme::Bcrypt(stored.to_string())
        } else if let Some(encoded) = stored.strip_prefix(SHA_PREFIX) {
            HashScheme::SaltedSha1(encoded.to_string())
        } else {
            HashScheme::Unsupported
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            HashScheme::Bcrypt(_) => "bcrypt",
            HashScheme::SaltedSha1(_) => "sha1",
            HashScheme::Unsupported => "unsupported",
        }
    }

    /// Check `password` against this hash
    pub fn verify(&self, password: &str) -> Result<(), AuthError> {
        match self {
            HashScheme::Bcrypt(hash) => match bcrypt::verify(password, hash) {
                Ok(true) => Ok(()),
                Ok(false) => Err(AuthError::PasswordMismatch),
                Err(err) => {
                    tracing::debug!("unparseable bcrypt hash: {err}");
                    Err(AuthError::PasswordMismatch)
                },
            },
            HashScheme::SaltedSha1(encoded) => verify_sha1(encoded, password),
            HashScheme::Unsupported => Err(AuthError::UnsupportedHash),
        }
    }
}

/// Work factor from a `$2x$NN$...` header; `None` if the header is unreadable
pub(crate) fn bcrypt_cost(hash: &str) -> Option<u32> {
    hash.split('$').nth(2)?.parse().ok()
}

fn verify_sha1(encoded: &str, password: &str) -> Result<(), AuthError> {
    let stored = STANDARD
        .decode(encoded)
        .map_err(|e| AuthError::MalformedHash(e.to_string()))?;
    if stored.len() != SHA1_DIGEST_LEN {
        return Err(AuthError::MalformedHash(format!(
            "expected {SHA1_DIGEST_LEN} byte digest, got {}",
            stored.len()
        )));
    }

    let computed = Sha1::digest(password.as_bytes());
    if bool::from(computed.as_slice().ct_eq(&stored)) {
        Ok(())
    } else {
        Err(AuthError::PasswordMismatch)
    }
}
