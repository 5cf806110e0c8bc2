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
use crate::categories::dto::{CreateCategoryRequest, DeleteParams, UpdateCategoryRequest};
use crate::categories::repo::Category;
use crate::courses::dto::CourseResponse;
use crate::courses::repo::Course;
use crate::error::ApiError;
use crate::slug::slugify;
use crate::state::AppState;

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:slug",
            get(get_category_by_slug)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/categories/:slug/courses", get(list_category_courses))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(Category::list(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category = Category::find_by_slug(&state.db, &slug)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;
    Ok(Json(category))
}

#[instrument(skip(state))]
pub async fn list_category_courses(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let category = Category::find_by_slug(&state.db, &slug)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;
    let rows = Course::list_by_category(&state.db, category.id).await?;
    Ok(Json(rows.into_iter().map(CourseResponse::from).collect()))
}

#[instrument(skip(state, admin, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    payload.validate()?;

    let name = payload.name.trim();
    let slug = slugify(name);
    if Category::slug_exists(&state.db, &slug, None).await? {
        warn!(%slug, "category slug collision");
        return Err(ApiError::Conflict(
            "Category with this name already exists".into(),
        ));
    }

    let category = Category::create(
        &state.db,
        name,
        &slug,
        payload.description.trim(),
        payload.image_url.trim(),
    )
    .await?;

    info!(category_id = %category.id, %slug, admin_id = %admin.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, admin, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    payload.validate()?;

    let existing = Category::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.name);
    // A renamed category gets a fresh slug, checked against everyone else.
    let slug = if name != existing.name {
        let slug = slugify(name);
        if Category::slug_exists(&state.db, &slug, Some(id)).await? {
            return Err(ApiError::Conflict(
                "Category with this name already exists".into(),
            ));
        }
        slug
    } else {
        existing.slug.clone()
    };

    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.description);
    let image_url = payload
        .image_url
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.image_url);

    let category = Category::update(&state.db, id, name, &slug, description, image_url).await?;
    info!(category_id = %id, admin_id = %admin.id, "category updated");
    Ok(Json(category))
}

#[instrument(skip(state, admin))]
pub async fn delete_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let category = Category::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    let courses = Category::course_count(&state.db, id).await?;
    if courses > 0 && !params.confirm {
        return Err(ApiError::Conflict(format!(
            "Category still has {courses} course(s); resend with confirm=true to cascade-delete"
        )));
    }

    Category::delete(&state.db, id).await?;
    info!(category_id = %id, slug = %category.slug, admin_id = %admin.id, "category deleted");
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
