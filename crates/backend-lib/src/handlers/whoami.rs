// crates/backend-lib/src/handlers/whoami.rs
use super::escape_html;
use crate::AuthenticatedUser;
use axum::{response::Html, Extension};

/// `GET /whoami`
pub async fn whoami(Extension(AuthenticatedUser(username)): Extension<AuthenticatedUser>) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<h1>Username: {}</h1>",
        escape_html(&username)
    ))
}
