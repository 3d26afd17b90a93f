// ==========================================
// tests/integration/form_login_flow_tests.rs
// ==========================================
//! Login form, session cookie, and the session gate
use crate::test_utils::{body_string, location, send, set_cookie_pair, setup_test_env, INDEX_BODY};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use gatehouse_backend::{config::AuthMode, handlers::login::LOGIN_ERROR};
use std::time::Duration;

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_login(cookie: Option<&str>, username: &str, password: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap()
}

#[tokio::test]
async fn test_full_login_flow() {
    let env = setup_test_env(AuthMode::Form);
    let app = env.router();

    // unauthenticated: redirected to the login page with a fresh session
    let response = send(&app, get("/whoami", None)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/login"));
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    let cookie = set_cookie_pair(&response).unwrap();
    assert!(cookie.starts_with("SESSIONID="));

    // the login page is public
    let response = send(&app, get("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("<form"));

    // bad password re-renders the form
    let response = send(&app, post_login(Some(&cookie), "bob", "wrong")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains(LOGIN_ERROR));
    assert!(page.contains("value=\"bob\""));

    // good password returns to the remembered page, reusing the session
    let response = send(&app, post_login(Some(&cookie), "bob", "secret")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/whoami"));
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let response = send(&app, get("/whoami", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("<h1>Username: bob</h1>"));

    let response = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, INDEX_BODY);

    assert_eq!(env.state.sessions.len(), 1);
}

#[tokio::test]
async fn test_login_without_cookie_defaults_to_root() {
    let env = setup_test_env(AuthMode::Form);
    let app = env.router();

    let response = send(&app, post_login(None, "alice", "wonderland")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/"));
    let cookie = set_cookie_pair(&response).unwrap();

    let response = send(&app, get("/whoami", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Username: alice"));
}

#[tokio::test]
async fn test_unauthenticated_favicon_is_forbidden() {
    let env = setup_test_env(AuthMode::Form);
    let app = env.router();

    let response = send(&app, get("/favicon.ico", None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_forged_cookie_gets_new_session() {
    let env = setup_test_env(AuthMode::Form);
    let app = env.router();

    let response = send(&app, get("/whoami", Some("SESSIONID=forged"))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let cookie = set_cookie_pair(&response).unwrap();
    assert_ne!(cookie, "SESSIONID=forged");
}

#[tokio::test]
async fn test_expired_session_requires_new_login() {
    let env = setup_test_env(AuthMode::Form);
    let app = env.router();

    let response = send(&app, post_login(None, "bob", "secret")).await;
    let cookie = set_cookie_pair(&response).unwrap();
    let response = send(&app, get("/whoami", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    // still usable past its timeout until a sweep runs
    env.clock.advance(Duration::from_secs(301));
    let response = send(&app, get("/whoami", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(env.state.sessions.collect_garbage(), 1);
    let response = send(&app, get("/whoami", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/login"));
    assert_ne!(set_cookie_pair(&response).unwrap(), cookie);
}
