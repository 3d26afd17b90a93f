// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use crate::htpasswd::AuthError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Realm announced in `WWW-Authenticate` challenges
pub const BASIC_CHALLENGE: &str = "Basic";

/// Request-level errors of the HTTP layer
#[derive(Error, Debug)]
pub enum AppError {
    #[error("authentication required")]
    AuthenticationRequired,

    #[error("access denied: {0}")]
    AccessDenied(#[from] AuthError),

    #[error("forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied(_) | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::AuthenticationRequired => "AUTH_001",
            AppError::AccessDenied(_) => "AUTH_002",
            AppError::Forbidden => "AUTH_003",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Message safe to show to clients. Verification failures all collapse to
    /// the same text so the response does not reveal which usernames exist.
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::AuthenticationRequired => "authentication required".to_string(),
            AppError::AccessDenied(_) => "access denied".to_string(),
            AppError::Forbidden => "forbidden".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.sanitized_message(),
            }
        });

        let mut response = (status, axum::Json(body)).into_response();
        if matches!(self, AppError::AuthenticationRequired) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }
        response
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("verification task failed: {err}"))
    }
}
