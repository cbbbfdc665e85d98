//! Server error types.

use auth::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

/// Error codes carried in JSON error bodies.
pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Where [`ServerError::LoginRequired`] sends the browser.
pub const LOGIN_PATH: &str = "/login";

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The route needs a logged-in session.
    #[error("Login required")]
    LoginRequired,

    /// The logged-in user does not own the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] catalog_store::CatalogStoreError),

    /// Identity flow error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Session read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Status code for an identity flow error.
pub fn auth_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidState
        | AuthError::ExchangeFailed
        | AuthError::SubjectMismatch
        | AuthError::ClientMismatch
        | AuthError::NotConnected => StatusCode::UNAUTHORIZED,
        AuthError::AlreadyConnected => StatusCode::OK,
        AuthError::RevokeFailed => StatusCode::BAD_REQUEST,
        AuthError::TokenInvalid(_)
        | AuthError::MalformedIdToken(_)
        | AuthError::Provider(_)
        | AuthError::Http(_)
        | AuthError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A bare JSON string body, the shape the sign-in script expects.
pub fn json_message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(message.into())).into_response()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, error_codes::INVALID_REQUEST, msg.clone())
            }
            ServerError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, error_codes::RESOURCE_NOT_FOUND, msg.clone())
            }
            ServerError::LoginRequired => {
                return Redirect::to(LOGIN_PATH).into_response();
            }
            ServerError::Forbidden(msg) => {
                tracing::warn!(reason = %msg, "Forbidden");
                (StatusCode::FORBIDDEN, error_codes::PERMISSION_DENIED, msg.clone())
            }
            ServerError::Store(e) => {
                tracing::error!(error = %e, "Store error");
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR, e.to_string())
            }
            ServerError::Auth(e) => {
                let status = auth_status(e);
                if status.is_server_error() {
                    tracing::error!(error = %e, "Identity verification failed");
                }
                return json_message(status, e.to_string());
            }
            ServerError::Session(e) => {
                tracing::error!(error = %e, "Session error");
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR, e.to_string())
            }
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
