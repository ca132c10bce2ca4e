// src/routes/sessions.rs

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use super::{desk_error, ApiError, CurrentSession};
use crate::session::{self, Session};
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(b): Json<LoginBody>,
) -> Result<Json<Session>, ApiError> {
    let session = session::login(state.accounts.as_ref(), &state.sessions, &b.email, &b.password)
        .await
        .map_err(desk_error)?;
    Ok(Json(session))
}

pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<serde_json::Value> {
    let closed = state.sessions.close(&session.token).await;
    info!(email = session.viewer.email(), "session closed");
    Json(serde_json::json!({ "logged_out": closed }))
}

pub async fn me(CurrentSession(session): CurrentSession) -> Json<Session> {
    Json(session)
}
