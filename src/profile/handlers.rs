use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::auth::dto::UserResponse;
use crate::auth::extractors::CurrentUser;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::profile::dto::{ProfileRequest, ProfileResponse};
use crate::profile::repo::Profile;
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state, user))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user.id)
        .await?
        .ok_or(ApiError::NotFound("Profile"))?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate()?;

    let profile = Profile::upsert(
        &state.db,
        user.id,
        payload.full_name.as_deref().map(str::trim),
        payload.bio.as_deref(),
        payload.interest.as_deref(),
        payload.profile_image_url.as_deref(),
    )
    .await?;

    // Completing the form unlocks the rest of the app for this user.
    if !user.has_completed_profile {
        User::mark_profile_completed(&state.db, user.id).await?;
    }

    let user = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(UserResponse::from_user(user, Some(profile))))
}
