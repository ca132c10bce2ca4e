// src/error.rs

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("permission denied: {action}")]
    Forbidden { action: &'static str },

    #[error("authentication required: {message}")]
    Unauthorized { message: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl DeskError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    pub fn forbidden(action: &'static str) -> Self {
        Self::Forbidden { action }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DeskError::NotFound { .. } => StatusCode::NOT_FOUND,
            DeskError::Forbidden { .. } => StatusCode::FORBIDDEN,
            DeskError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            DeskError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            DeskError::Conflict { .. } => StatusCode::CONFLICT,
            DeskError::Store(_) | DeskError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T, E = DeskError> = std::result::Result<T, E>;
