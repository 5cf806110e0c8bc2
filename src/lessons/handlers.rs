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
use crate::courses::repo::Course;
use crate::error::ApiError;
use crate::lessons::dto::{CreateLessonRequest, UpdateLessonRequest};
use crate::lessons::repo::Lesson;
use crate::state::AppState;

pub fn lesson_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/:id/lessons",
            get(list_lessons).post(create_lesson),
        )
        .route("/lessons/:id", put(update_lesson).delete(delete_lesson))
}

#[instrument(skip(state))]
pub async fn list_lessons(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<Lesson>>, ApiError> {
    if !Course::exists(&state.db, course_id).await? {
        return Err(ApiError::NotFound("Course"));
    }
    Ok(Json(Lesson::list_by_course(&state.db, course_id).await?))
}

#[instrument(skip(state, admin, payload))]
pub async fn create_lesson(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<(StatusCode, Json<Lesson>), ApiError> {
    payload.validate()?;

    if !Course::exists(&state.db, course_id).await? {
        return Err(ApiError::NotFound("Course"));
    }

    let lesson = Lesson::create(
        &state.db,
        course_id,
        payload.title.trim(),
        payload.description.trim(),
        payload.content.as_deref(),
        payload.video_url.as_deref(),
        payload.duration.trim(),
        payload.position,
    )
    .await?;

    info!(lesson_id = %lesson.id, %course_id, admin_id = %admin.id, "lesson created");
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[instrument(skip(state, admin, payload))]
pub async fn update_lesson(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLessonRequest>,
) -> Result<Json<Lesson>, ApiError> {
    payload.validate()?;

    let existing = Lesson::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Lesson"))?;

    let lesson = Lesson::update(
        &state.db,
        id,
        payload
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.title),
        payload
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.description),
        payload.content.as_deref().or(existing.content.as_deref()),
        payload
            .video_url
            .as_deref()
            .or(existing.video_url.as_deref()),
        payload
            .duration
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.duration),
        payload.position.unwrap_or(existing.position),
    )
    .await?;

    info!(lesson_id = %id, admin_id = %admin.id, "lesson updated");
    Ok(Json(lesson))
}

#[instrument(skip(state, admin))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let lesson = Lesson::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Lesson"))?;

    Lesson::delete(&state.db, &lesson).await?;
    info!(lesson_id = %id, course_id = %lesson.course_id, admin_id = %admin.id, "lesson deleted");
    Ok(Json(json!({ "message": "Lesson deleted successfully" })))
}
