// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Router wiring for both authentication modes.
use crate::config::AuthMode;
use crate::handlers::{login, login_page, whoami};
use crate::middleware::{require_basic_auth, require_session};
use crate::AppState;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the router for the configured mode
pub fn create_router(state: AppState) -> Router {
    let router = match state.settings.mode {
        AuthMode::Basic => basic_router(state),
        AuthMode::Form => form_router(state),
    };
    router.layer(TraceLayer::new_for_http())
}

/// Static directory behind HTTP Basic-Auth
pub fn basic_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.settings.static_dir);
    Router::new()
        .fallback_service(static_files)
        .layer(from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state)
}

/// Public `/login`; `/whoami` and the static directory behind the session gate
pub fn form_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.settings.static_dir);
    let protected = Router::new()
        .route("/whoami", get(whoami))
        .fallback_service(static_files)
        .layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/login", get(login_page).post(login))
        .merge(protected)
        .with_state(state)
}
