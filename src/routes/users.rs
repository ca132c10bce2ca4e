// src/routes/users.rs

use axum::{extract::{Path, Query, State}, Json};
use serde::Deserialize;
use tracing::info;

use super::{desk_error, ApiError, CurrentSession};
use crate::error::DeskError;
use crate::models::{Deleted, User};
use crate::search::filter_users;
use crate::session::{self, Registration};
use crate::AppState;

#[derive(Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ListUsersQ {
    pub q: Option<String>,
}

fn require_super_admin(session: &session::Session) -> Result<(), ApiError> {
    if session.viewer.is_super_admin() {
        Ok(())
    } else {
        Err(desk_error(DeskError::forbidden("manage users")))
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(b): Json<RegisterBody>,
) -> Result<Json<User>, ApiError> {
    let user = session::register(
        state.accounts.as_ref(),
        Registration { name: b.name, email: b.email, phone: b.phone, password: b.password },
    )
    .await
    .map_err(desk_error)?;
    Ok(Json(user))
}

pub async fn list_users(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(q): Query<ListUsersQ>,
) -> Result<Json<Vec<User>>, ApiError> {
    require_super_admin(&session)?;
    let users: Vec<User> = state
        .accounts
        .list_users()
        .await
        .map_err(desk_error)?
        .into_iter()
        .filter(|u| !u.is_reserved())
        .collect();
    Ok(Json(filter_users(&users, q.q.as_deref().unwrap_or_default())))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    require_super_admin(&session)?;
    state.accounts.delete_user(&id).await.map_err(desk_error)?;
    info!(user_id = %id, by = session.viewer.email(), "user removed");
    Ok(Json(Deleted { deleted: true }))
}
