use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{LoginRequest, RegisterRequest, UserResponse},
    extractors::CurrentUser,
    password::{hash_password, verify_password},
    repo::User,
    session::{self, Session},
};
use crate::error::ApiError;
use crate::profile::repo::Profile;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(current_user))
}

fn session_headers(state: &AppState, token: &str) -> anyhow::Result<HeaderMap> {
    let cfg = &state.config.session;
    let cookie = session::build_session_cookie(token, cfg.ttl_minutes * 60, cfg.cookie_secure);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie.parse().context("session cookie header value")?,
    );
    Ok(headers)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<UserResponse>), ApiError> {
    payload.validate()?;
    let username = payload.username.trim();

    if User::find_by_username(&state.db, username).await?.is_some() {
        warn!(%username, "username already taken");
        return Err(ApiError::Conflict("Username already exists".into()));
    }

    let hash = hash_password(&payload.password)?;
    let email = payload.email.as_deref().map(str::trim);
    let user = User::create(&state.db, username, &hash, email).await?;

    // Log the fresh user straight in, as the web client expects.
    let session = Session::create(&state.db, user.id, state.config.session.ttl_minutes).await?;
    let headers = session_headers(&state, &session.token)?;

    info!(user_id = %user.id, %username, "user registered");
    Ok((
        StatusCode::CREATED,
        headers,
        Json(UserResponse::from_user(user, None)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<UserResponse>), ApiError> {
    let username = payload.username.trim();

    let user = match User::find_by_username(&state.db, username).await? {
        Some(u) => u,
        None => {
            warn!(%username, "login unknown username");
            return Err(ApiError::Unauthorized("Invalid credentials"));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    let session = Session::create(&state.db, user.id, state.config.session.ttl_minutes).await?;
    let headers = session_headers(&state, &session.token)?;
    let profile = Profile::find_by_user(&state.db, user.id).await?;

    info!(user_id = %user.id, %username, "user logged in");
    Ok((headers, Json(UserResponse::from_user(user, profile))))
}

#[instrument(skip(state, user, request_headers))]
pub async fn logout(
    State(state): State<AppState>,
    request_headers: HeaderMap,
    CurrentUser(user): CurrentUser,
) -> Result<(HeaderMap, Json<Value>), ApiError> {
    if let Some(token) = request_headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session::token_from_cookie_header)
    {
        Session::delete(&state.db, token).await?;
    }

    let cookie = session::clear_session_cookie(state.config.session.cookie_secure);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie.parse().context("clear cookie header value")?,
    );

    info!(user_id = %user.id, "user logged out");
    Ok((headers, Json(json!({ "message": "Logged out successfully" }))))
}

#[instrument(skip(state, user))]
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user.id).await?;
    Ok(Json(UserResponse::from_user(user, profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn user_response_serialization_omits_password() {
        let user = User {
            id: Uuid::new_v4(),
            username: "bob".into(),
            password_hash: "$argon2id$hidden".into(),
            email: None,
            is_admin: false,
            has_completed_profile: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&UserResponse::from_user(user, None)).unwrap();
        assert!(json.contains("bob"));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
