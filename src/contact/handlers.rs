use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AdminUser;
use crate::contact::dto::ContactRequest;
use crate::contact::repo::ContactSubmission;
use crate::error::ApiError;
use crate::state::AppState;

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", get(list_submissions).post(submit))
        .route("/contact/:id", get(get_submission).delete(delete_submission))
        .route("/contact/:id/read", put(mark_submission_read))
}

#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactSubmission>), ApiError> {
    payload.validate()?;

    let submission = ContactSubmission::create(
        &state.db,
        payload.name.trim(),
        payload.email.trim(),
        payload.telegram_username.as_deref(),
        &payload.purpose,
        payload.message.trim(),
    )
    .await?;

    info!(submission_id = %submission.id, purpose = %submission.purpose, "contact submission received");
    Ok((StatusCode::CREATED, Json(submission)))
}

#[instrument(skip(state, _admin))]
pub async fn list_submissions(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<ContactSubmission>>, ApiError> {
    Ok(Json(ContactSubmission::list(&state.db).await?))
}

#[instrument(skip(state, _admin))]
pub async fn get_submission(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactSubmission>, ApiError> {
    let submission = ContactSubmission::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Contact submission"))?;
    Ok(Json(submission))
}

#[instrument(skip(state, admin))]
pub async fn mark_submission_read(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if ContactSubmission::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Contact submission"));
    }
    ContactSubmission::mark_read(&state.db, id).await?;
    info!(submission_id = %id, admin_id = %admin.id, "contact submission marked read");
    Ok(Json(json!({ "message": "Contact submission marked as read" })))
}

#[instrument(skip(state, admin))]
pub async fn delete_submission(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if ContactSubmission::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Contact submission"));
    }
    ContactSubmission::delete(&state.db, id).await?;
    info!(submission_id = %id, admin_id = %admin.id, "contact submission deleted");
    Ok(Json(json!({ "message": "Contact submission deleted successfully" })))
}
