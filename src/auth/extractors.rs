use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::repo::User;
use crate::auth::session::{self, Session};
use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the session cookie to its user, rejecting with 401 when the
/// cookie is missing, unknown, or expired. The resolved user is handed to
/// the handler as a plain value; repositories only ever see explicit
/// arguments, never ambient request state.
pub struct CurrentUser(pub User);

/// Same lookup as [`CurrentUser`] plus an admin check; rejects with 403 for
/// a valid session that lacks the role.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;

        let token = session::token_from_cookie_header(cookies)
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;

        let user = Session::find_user(&state.db, token)
            .await?
            .ok_or(ApiError::Unauthorized("Session expired or invalid"))?;

        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError::Forbidden("Admin access required"));
        }
        Ok(AdminUser(user))
    }
}
