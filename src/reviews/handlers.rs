use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::CurrentUser;
use crate::courses::repo::Course;
use crate::enrollments::repo::Enrollment;
use crate::error::ApiError;
use crate::reviews::dto::{CreateReviewRequest, ReviewResponse, UpdateReviewRequest};
use crate::reviews::repo::Review;
use crate::state::AppState;

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/:id/reviews",
            get(list_course_reviews).post(create_review),
        )
        .route("/reviews/:id", put(update_review).delete(delete_review))
}

#[instrument(skip(state))]
pub async fn list_course_reviews(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    if !Course::exists(&state.db, course_id).await? {
        return Err(ApiError::NotFound("Course"));
    }
    let rows = Review::list_for_course(&state.db, course_id).await?;
    Ok(Json(rows.into_iter().map(ReviewResponse::from).collect()))
}

#[instrument(skip(state, user, payload))]
pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    payload.validate()?;

    if !Course::exists(&state.db, course_id).await? {
        return Err(ApiError::NotFound("Course"));
    }

    // Only students of the course get to rate it.
    if !Enrollment::is_enrolled(&state.db, user.id, course_id).await? {
        warn!(user_id = %user.id, %course_id, "review attempt without enrollment");
        return Err(ApiError::Forbidden(
            "You must be enrolled to review this course",
        ));
    }

    let review = Review::create(
        &state.db,
        user.id,
        course_id,
        payload.title.trim(),
        payload.content.trim(),
        payload.rating,
        state.config.allow_multiple_reviews,
    )
    .await?;

    info!(review_id = %review.id, user_id = %user.id, %course_id, rating = review.rating, "review saved");
    Ok((StatusCode::CREATED, Json(review)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    payload.validate()?;

    let existing = Review::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;

    if existing.user_id != user.id && !user.is_admin {
        return Err(ApiError::Forbidden("You can only edit your own reviews"));
    }

    let review = Review::update(
        &state.db,
        id,
        existing.course_id,
        payload
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.title),
        payload
            .content
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.content),
        payload.rating.unwrap_or(existing.rating),
    )
    .await?;

    info!(review_id = %id, user_id = %user.id, "review updated");
    Ok(Json(review))
}

#[instrument(skip(state, user))]
pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let review = Review::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;

    if review.user_id != user.id && !user.is_admin {
        return Err(ApiError::Forbidden("You can only delete your own reviews"));
    }

    Review::delete(&state.db, &review).await?;
    info!(review_id = %id, course_id = %review.course_id, user_id = %user.id, "review deleted");
    Ok(Json(json!({ "message": "Review deleted successfully" })))
}
