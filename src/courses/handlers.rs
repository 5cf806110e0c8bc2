use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AdminUser;
use crate::categories::dto::DeleteParams;
use crate::categories::repo::Category;
use crate::courses::dto::{CourseResponse, CreateCourseRequest, UpdateCourseRequest};
use crate::courses::repo::Course;
use crate::error::ApiError;
use crate::slug::slugify;
use crate::state::AppState;

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
}

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let rows = Course::list_detail(&state.db).await?;
    Ok(Json(rows.into_iter().map(CourseResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, ApiError> {
    let row = Course::find_detail(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;
    Ok(Json(CourseResponse::from(row)))
}

#[instrument(skip(state, admin, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate()?;

    if Category::find_by_id(&state.db, payload.category_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Category"));
    }

    let title = payload.title.trim();
    let slug = slugify(title);
    if Course::slug_exists(&state.db, &slug, None).await? {
        warn!(%slug, "course slug collision");
        return Err(ApiError::Conflict(
            "Course with this title already exists".into(),
        ));
    }

    let course = Course::create(
        &state.db,
        title,
        &slug,
        payload.description.trim(),
        payload.long_description.as_deref(),
        payload.image_url.trim(),
        payload.category_id,
        admin.id,
        payload.price,
        payload.original_price,
        payload.duration.trim(),
        payload.learning_objectives.as_deref(),
        payload.requirements.as_deref(),
        payload.target_audience.as_deref(),
    )
    .await?;

    let row = Course::find_detail(&state.db, course.id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;

    info!(course_id = %course.id, %slug, admin_id = %admin.id, "course created");
    Ok((StatusCode::CREATED, Json(CourseResponse::from(row))))
}

#[instrument(skip(state, admin, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate()?;

    let existing = Course::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;

    let category_id = payload.category_id.unwrap_or(existing.category_id);
    if category_id != existing.category_id
        && Category::find_by_id(&state.db, category_id).await?.is_none()
    {
        return Err(ApiError::NotFound("Category"));
    }

    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.title);
    let slug = if title != existing.title {
        let slug = slugify(title);
        if Course::slug_exists(&state.db, &slug, Some(id)).await? {
            return Err(ApiError::Conflict(
                "Course with this title already exists".into(),
            ));
        }
        slug
    } else {
        existing.slug.clone()
    };

    let course = Course::update(
        &state.db,
        id,
        title,
        &slug,
        payload
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.description),
        payload
            .long_description
            .as_deref()
            .or(existing.long_description.as_deref()),
        payload
            .image_url
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.image_url),
        category_id,
        payload.price.or(existing.price),
        payload.original_price.or(existing.original_price),
        payload
            .duration
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.duration),
        payload
            .learning_objectives
            .as_deref()
            .or(existing.learning_objectives.as_deref()),
        payload
            .requirements
            .as_deref()
            .or(existing.requirements.as_deref()),
        payload
            .target_audience
            .as_deref()
            .or(existing.target_audience.as_deref()),
    )
    .await?;

    let row = Course::find_detail(&state.db, course.id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;

    info!(course_id = %id, admin_id = %admin.id, "course updated");
    Ok(Json(CourseResponse::from(row)))
}

#[instrument(skip(state, admin))]
pub async fn delete_course(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let course = Course::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;

    let counts = Course::dependent_counts(&state.db, id).await?;
    if counts.total() > 0 && !params.confirm {
        return Err(ApiError::Conflict(format!(
            "Course still has {} lesson(s), {} enrollment(s) and {} review(s); \
             resend with confirm=true to cascade-delete",
            counts.lessons, counts.enrollments, counts.reviews
        )));
    }

    Course::delete(&state.db, id).await?;
    info!(course_id = %id, slug = %course.slug, admin_id = %admin.id, "course deleted");
    Ok(Json(json!({ "message": "Course deleted successfully" })))
}
