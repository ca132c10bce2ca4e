// src/routes/complaints.rs

use axum::{extract::{Path, Query, State}, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::{desk_error, ApiError, CurrentSession};
use crate::board::{BoardRow, BoardView, ComplaintBoard};
use crate::error::DeskError;
use crate::models::{is_known_department, Complaint, ComplaintStatus, Deleted, NewComplaint, Priority};
use crate::policy::{self, Viewer};
use crate::report::{self, FixedAdvance, ReportLayout};
use crate::session::Session;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateComplaintBody {
    pub department: String,
    #[serde(rename = "type")]
    pub complaint_type: String,
    pub contact_person: String,
    pub phone: String,
    /// Defaults to the session's email. Clients may only file as themselves.
    pub email: Option<String>,
    pub description: String,
    pub priority: String,
    pub location: String,
}

#[derive(Deserialize)]
pub struct ListQ {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct PatchStatusBody {
    pub status: String,
    #[serde(default)]
    pub remarks: String,
}

fn required(field: &str, value: String) -> Result<String, DeskError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(DeskError::invalid_input(format!("{field} is required")));
    }
    Ok(v.to_string())
}

fn validate(b: CreateComplaintBody, session: &Session) -> Result<NewComplaint, DeskError> {
    let department = required("department", b.department)?;
    if !is_known_department(&department) {
        return Err(DeskError::invalid_input(format!("unknown department '{department}'")));
    }
    let priority: Priority = b.priority.parse().map_err(DeskError::invalid_input)?;
    let own = session.viewer.email();
    let email = match (&session.viewer, b.email) {
        (Viewer::Client { .. }, Some(e)) if !e.trim().eq_ignore_ascii_case(own) => {
            return Err(DeskError::forbidden("file a complaint for another account"));
        }
        (Viewer::Client { .. }, _) | (_, None) => own.to_string(),
        (_, Some(e)) => e,
    };
    Ok(NewComplaint {
        department,
        complaint_type: required("type", b.complaint_type)?,
        contact_person: required("contact_person", b.contact_person)?,
        phone: required("phone", b.phone)?,
        email: required("email", email)?,
        description: required("description", b.description)?,
        priority,
        location: required("location", b.location)?,
    })
}

async fn loaded_board(state: &AppState, session: &Session) -> Result<ComplaintBoard, ApiError> {
    let mut board = ComplaintBoard::new(state.complaints.clone(), session.viewer.clone());
    board.load().await.map_err(desk_error)?;
    Ok(board)
}

pub async fn create_complaint(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(b): Json<CreateComplaintBody>,
) -> Result<Json<Complaint>, ApiError> {
    let submission = validate(b, &session).map_err(desk_error)?;

    let exists = state
        .complaints
        .exists_for(&submission.email, &submission.complaint_type)
        .await
        .map_err(desk_error)?;
    if exists {
        return Err(desk_error(DeskError::conflict("complaint already registered")));
    }

    let saved = state
        .complaints
        .insert(Complaint::from_submission(submission))
        .await
        .map_err(desk_error)?;
    info!(complaint_id = %saved.id, department = ?saved.department, "complaint registered");
    Ok(Json(saved))
}

pub async fn list_complaints(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(q): Query<ListQ>,
) -> Result<Json<BoardView>, ApiError> {
    let mut board = loaded_board(&state, &session).await?;
    board.search(q.q.as_deref().unwrap_or_default());
    Ok(Json(board.view()))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<BoardRow>, ApiError> {
    let board = loaded_board(&state, &session).await?;
    let complaint = board.find(&id).map_err(desk_error)?.clone();
    let actions = policy::actions_for(board.viewer(), &complaint);
    Ok(Json(BoardRow { complaint, actions }))
}

pub async fn patch_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(b): Json<PatchStatusBody>,
) -> Result<Json<BoardRow>, ApiError> {
    let status: ComplaintStatus =
        b.status.parse().map_err(|e: String| desk_error(DeskError::invalid_input(e)))?;
    let mut board = loaded_board(&state, &session).await?;
    let complaint = board.update_status(&id, status, &b.remarks).await.map_err(desk_error)?;
    info!(complaint_id = %id, status = %status, by = session.viewer.email(), "complaint status updated");
    let actions = policy::actions_for(board.viewer(), &complaint);
    Ok(Json(BoardRow { complaint, actions }))
}

pub async fn delete_complaint(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let mut board = loaded_board(&state, &session).await?;
    board.remove(&id).await.map_err(desk_error)?;
    info!(complaint_id = %id, by = session.viewer.email(), "complaint removed");
    Ok(Json(Deleted { deleted: true }))
}

pub async fn get_report(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ReportLayout>, ApiError> {
    let board = loaded_board(&state, &session).await?;
    let complaint = board.find(&id).map_err(desk_error)?;
    Ok(Json(report::layout(complaint, &FixedAdvance::default(), Utc::now())))
}
