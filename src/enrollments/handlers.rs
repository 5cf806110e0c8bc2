use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::CurrentUser;
use crate::courses::repo::Course;
use crate::enrollments::dto::{EnrolledCourseResponse, EnrollmentStatusResponse, ProgressRequest};
use crate::enrollments::repo::Enrollment;
use crate::error::ApiError;
use crate::state::AppState;

pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/courses/:id/enrollment", get(enrollment_status))
        .route("/courses/:id/enroll", post(enroll))
        .route("/courses/:id/progress", put(set_progress))
        .route("/enrollments", get(list_my_enrollments))
}

#[instrument(skip(state, user))]
pub async fn enrollment_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<EnrollmentStatusResponse>, ApiError> {
    if !Course::exists(&state.db, course_id).await? {
        return Err(ApiError::NotFound("Course"));
    }
    let enrollment = Enrollment::find(&state.db, user.id, course_id).await?;
    Ok(Json(EnrollmentStatusResponse {
        enrolled: enrollment.is_some(),
        enrollment,
    }))
}

#[instrument(skip(state, user))]
pub async fn enroll(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    if !Course::exists(&state.db, course_id).await? {
        return Err(ApiError::NotFound("Course"));
    }

    let enrollment = Enrollment::get_or_create(&state.db, user.id, course_id).await?;
    info!(user_id = %user.id, %course_id, enrollment_id = %enrollment.id, "enrolled");
    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[instrument(skip(state, user, payload))]
pub async fn set_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<ProgressRequest>,
) -> Result<Json<Enrollment>, ApiError> {
    payload.validate()?;

    let enrollment = Enrollment::set_progress(&state.db, user.id, course_id, payload.progress)
        .await?
        .ok_or(ApiError::NotFound("Enrollment"))?;

    info!(
        user_id = %user.id, %course_id,
        progress = enrollment.progress, completed = enrollment.completed,
        "progress updated"
    );
    Ok(Json(enrollment))
}

#[instrument(skip(state, user))]
pub async fn list_my_enrollments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EnrolledCourseResponse>>, ApiError> {
    let rows = Enrollment::list_with_courses(&state.db, user.id).await?;
    Ok(Json(
        rows.into_iter().map(EnrolledCourseResponse::from).collect(),
    ))
}
