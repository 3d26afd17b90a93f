// ============================
// crates/backend-lib/src/middleware/basic_auth.rs
// ============================
//! HTTP Basic-Auth gate.
use crate::{error::AppError, AppState, AuthenticatedUser};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Credentials carried by an `Authorization: Basic` header
#[derive(Debug, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/** Extract Basic-Auth credentials from request headers
# Returns
`None` when there is no `Authorization` header, the scheme is not Basic, or
the payload cannot be decoded into `user:password`. */
pub fn basic_credentials(headers: &HeaderMap) -> Option<BasicCredentials> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => String::from_utf8(bytes).ok()?,
        Err(err) => {
            debug!("undecodable basic credentials: {err}");
            return None;
        },
    };
    let (username, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Reject requests without valid Basic-Auth credentials
pub async fn require_basic_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    debug!(method = %request.method(), uri = %request.uri(), "basic auth gate");

    let credentials =
        basic_credentials(request.headers()).ok_or(AppError::AuthenticationRequired)?;
    state
        .verify_credentials(&credentials.username, &credentials.password)
        .await?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser(credentials.username));
    Ok(next.run(request).await)
}
