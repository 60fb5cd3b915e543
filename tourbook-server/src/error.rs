//! Server error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("No token provided")]
    NoToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Forbidden access")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store operation {0} timed out")]
    StoreTimeout(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Stable machine-readable code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::NoToken => "unauthorized",
            ServerError::InvalidToken => "invalid_token",
            ServerError::Forbidden => "forbidden",
            ServerError::NotFound(_) => "not_found",
            ServerError::Validation(_) => "validation",
            ServerError::StoreTimeout(_) | ServerError::Internal(_) => "internal",
        }
    }
}

impl From<tourbook_core::Error> for ServerError {
    fn from(err: tourbook_core::Error) -> Self {
        use tourbook_core::Error as CoreError;

        match err {
            CoreError::TokenExpired | CoreError::InvalidToken(_) => ServerError::InvalidToken,
            CoreError::MissingSecret | CoreError::Json(_) | CoreError::Jwt(_) => {
                ServerError::Internal(err.to_string())
            }
            other => ServerError::Validation(other.to_string()),
        }
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(err: rusqlite::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::NoToken => (StatusCode::UNAUTHORIZED, "no token provided".to_string()),
            ServerError::InvalidToken => (StatusCode::FORBIDDEN, "invalid token".to_string()),
            ServerError::Forbidden => (StatusCode::FORBIDDEN, "forbidden access".to_string()),
            ServerError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            ServerError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::StoreTimeout(op) => {
                tracing::error!(op, "Store operation timed out");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = json!({ "error": self.code(), "message": message });
        (status, axum::Json(body)).into_response()
    }
}
