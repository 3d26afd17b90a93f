// ==========================================
// tests/integration/basic_auth_flow_tests.rs
// ==========================================
//! Static files behind HTTP Basic-Auth
use crate::test_utils::{body_string, send, setup_test_env, INDEX_BODY};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gatehouse_backend::config::AuthMode;

fn get(uri: &str, credentials: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some((user, pass)) = credentials {
        let encoded = STANDARD.encode(format!("{user}:{pass}"));
        builder = builder.header(header::AUTHORIZATION, format!("Basic {encoded}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_credentials_are_challenged() {
    let env = setup_test_env(AuthMode::Basic);
    let app = env.router();

    let response = send(&app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic"
    );
}

#[tokio::test]
async fn test_valid_credentials_serve_static_files() {
    let env = setup_test_env(AuthMode::Basic);
    let app = env.router();

    let response = send(&app, get("/", Some(("bob", "secret")))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, INDEX_BODY);

    // bcrypt user, username matched case-insensitively
    let response = send(&app, get("/index.html", Some(("ALICE", "wonderland")))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_credentials_are_denied() {
    let env = setup_test_env(AuthMode::Basic);
    let app = env.router();

    let wrong_password = send(&app, get("/", Some(("bob", "wrong")))).await;
    assert_eq!(wrong_password.status(), StatusCode::FORBIDDEN);

    let unknown_user = send(&app, get("/", Some(("mallory", "secret")))).await;
    assert_eq!(unknown_user.status(), StatusCode::FORBIDDEN);

    // both failures look the same to the client
    assert_eq!(
        body_string(wrong_password).await,
        body_string(unknown_user).await
    );
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let env = setup_test_env(AuthMode::Basic);
    let app = env.router();

    let request = Request::builder()
        .uri("/")
        .header(header::AUTHORIZATION, "Basic %%%")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic"
    );

    // credentials without a ':' separator are challenged the same way
    let request = Request::builder()
        .uri("/")
        .header(header::AUTHORIZATION, "Basic Ym9ic2VjcmV0")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn test_missing_file_after_authentication() {
    let env = setup_test_env(AuthMode::Basic);
    let app = env.router();

    let response = send(&app, get("/nope.txt", Some(("bob", "secret")))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_basic_mode_issues_no_session_cookie() {
    let env = setup_test_env(AuthMode::Basic);
    let app = env.router();

    let response = send(&app, get("/", Some(("bob", "secret")))).await;
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(env.state.sessions.is_empty());
}
