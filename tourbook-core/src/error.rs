//! Error types for tourbook-core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Token signing secret is not configured")]
    MissingSecret,

    #[error("Identity claim must contain a non-empty email")]
    MissingEmail,

    #[error("Identity claim must be a JSON object")]
    InvalidIdentity,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Role {0} cannot be requested")]
    RoleNotRequestable(String),

    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),

    #[error("Booking status cannot change from {from} to {to}")]
    TransitionNotAllowed { from: String, to: String },

    #[error("Invalid tour guide reference: {0}")]
    InvalidGuideRef(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
