// ============================
// crates/backend-lib/src/handlers/login.rs
// ============================
//! Form login backed by the session store.
use super::escape_html;
use crate::{
    middleware::session::found,
    sessions::{REDIRECT_URI_KEY, USERNAME_KEY},
    AppState,
};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::info;

/// Message shown when credentials are rejected
pub const LOGIN_ERROR: &str = "Login error!";

/// Fields posted by the login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Render the login page, pre-filling the username and showing `message`
pub fn render_login(username: &str, message: &str) -> String {
    let message = if message.is_empty() {
        String::new()
    } else {
        format!("<p class=\"error\">{}</p>\n", escape_html(message))
    };
    format!(
        "<!DOCTYPE html>\n\
         <html>\n<head><title>Login</title></head>\n<body>\n\
         <h1>Login</h1>\n{message}\
         <form method=\"post\" action=\"/login\">\n\
         <label>Username <input type=\"text\" name=\"username\" value=\"{}\" autofocus></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <button type=\"submit\">Login</button>\n\
         </form>\n</body>\n</html>\n",
        escape_html(username)
    )
}

/// `GET /login`
pub async fn login_page() -> Html<String> {
    Html(render_login("", ""))
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let username = form.username.trim();
    let password = form.password.trim();

    if state.verify_credentials(username, password).await.is_err() {
        return Html(render_login(username, LOGIN_ERROR)).into_response();
    }

    let lookup = state.sessions.get_or_create_from_headers(&headers);
    lookup.session.set(USERNAME_KEY, username);
    info!(username, "logged in");

    let target = lookup
        .session
        .get(REDIRECT_URI_KEY)
        .filter(|uri| is_local_path(uri))
        .unwrap_or_else(|| "/".to_string());

    let mut response = found(&target);
    lookup.apply_to(response.headers_mut());
    response
}

/// Only same-origin absolute paths are valid redirect targets
fn is_local_path(uri: &str) -> bool {
    uri.starts_with('/') && !uri.starts_with("//") && !uri.starts_with("/\\")
}
