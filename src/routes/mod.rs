use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    routing::{delete, get, patch, post},
    Router,
};
use tracing::error;
use uuid::Uuid;

use crate::error::DeskError;
use crate::session::Session;
use crate::AppState;

pub mod complaints;
pub mod health;
pub mod sessions;
pub mod users;

pub type ApiError = (StatusCode, String);

// Common error mapper
pub fn internal_error<E: std::fmt::Display>(e: E) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("internal error: {e}"))
}

pub fn desk_error(e: DeskError) -> ApiError {
    match e {
        DeskError::Store(inner) => {
            error!(error = %inner, "store call failed");
            internal_error(inner)
        }
        DeskError::Hashing(reason) => {
            error!(%reason, "password hashing failed");
            internal_error(reason)
        }
        other => (other.status_code(), other.to_string()),
    }
}

/// Session named by the `Authorization: Bearer <token>` header.
pub struct CurrentSession(pub Session);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|t| Uuid::parse_str(t.trim()).ok())
            .ok_or_else(|| desk_error(DeskError::unauthorized("missing or malformed bearer token")))?;

        state
            .sessions
            .get(&token)
            .await
            .map(CurrentSession)
            .ok_or_else(|| desk_error(DeskError::unauthorized("session expired or logged out")))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // health
        .route("/health", get(health::health))
        // accounts & sessions
        .route("/api/v1/users/register", post(users::register))
        .route(
            "/api/v1/sessions",
            post(sessions::login).delete(sessions::logout),
        )
        .route("/api/v1/sessions/me", get(sessions::me))
        // user management
        .route("/api/v1/users", get(users::list_users))
        .route("/api/v1/users/:id", delete(users::delete_user))
        // complaints
        .route(
            "/api/v1/complaints",
            post(complaints::create_complaint).get(complaints::list_complaints),
        )
        .route(
            "/api/v1/complaints/:id",
            get(complaints::get_complaint).delete(complaints::delete_complaint),
        )
        .route("/api/v1/complaints/:id/status", patch(complaints::patch_status))
        .route("/api/v1/complaints/:id/report", get(complaints::get_report))
        .with_state(state)
}
