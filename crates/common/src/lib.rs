// ================
// crates/common/src/lib.rs
// ================
//! Primitives shared by the `Gatehouse` credential verifier and session store:
//! secure token generation and the clock used for expiry arithmetic.

pub mod clock;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use token::{generate_secure_token, generate_secure_token_with_size, DEFAULT_TOKEN_BYTES};
