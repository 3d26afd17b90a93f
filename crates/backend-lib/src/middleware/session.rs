// ============================
// crates/backend-lib/src/middleware/session.rs
// ============================
//! Session-cookie gate used by the form login flow.
use crate::{
    error::AppError,
    sessions::{REDIRECT_URI_KEY, USERNAME_KEY},
    AppState, AuthenticatedUser,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

/// Path of the login page
pub const LOGIN_PATH: &str = "/login";

/// Build a `302 Found` redirect
pub fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => (StatusCode::FOUND, [(header::LOCATION, HeaderValue::from_static("/"))])
            .into_response(),
    }
}

/// Let through requests whose session holds a username; send everyone else
/// to the login page, remembering where they were going.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let lookup = state.sessions.get_or_create_from_headers(request.headers());
    let path = request.uri().path().to_string();

    let mut response = match lookup.session.get(USERNAME_KEY) {
        Some(username) => {
            request.extensions_mut().insert(AuthenticatedUser(username));
            next.run(request).await
        },
        None if path == "/favicon.ico" => AppError::Forbidden.into_response(),
        None => {
            debug!(%path, "no authenticated session, redirecting to login");
            lookup.session.set(REDIRECT_URI_KEY, path);
            found(LOGIN_PATH)
        },
    };

    lookup.apply_to(response.headers_mut());
    response
}
