// ============================
// crates/common/src/token.rs
// ============================
//! Secure token generation for session identifiers.
//!
//! Tokens are drawn from the thread-local CSPRNG, which is seeded from the
//! operating system, and encoded so they can travel in a cookie unescaped.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

/// Default token size in bytes (32 bytes = 256 bits of entropy)
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Smallest token we are willing to hand out (128 bits)
const MIN_TOKEN_BYTES: usize = 16;

/** Generate a cryptographically secure random token
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_secure_token() -> String {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/** Generate a cryptographically secure random token with specified size
# Arguments
* `bytes` - The size of the random token in bytes, clamped to at least 16
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes.max(MIN_TOKEN_BYTES)];
    rand::rng().fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
