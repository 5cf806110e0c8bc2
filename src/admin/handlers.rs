use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::FromRow;
use tracing::instrument;

use crate::auth::extractors::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/dashboard/stats", get(dashboard_stats))
}

#[derive(Debug, Serialize, FromRow)]
pub struct DashboardStats {
    pub users: i64,
    pub courses: i64,
    pub categories: i64,
    pub enrollments: i64,
}

#[instrument(skip(state, _admin))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT (SELECT count(*) FROM users) AS users,
               (SELECT count(*) FROM courses) AS courses,
               (SELECT count(*) FROM categories) AS categories,
               (SELECT count(*) FROM enrollments) AS enrollments
        "#,
    )
    .fetch_one(&state.db)
    .await
    .map_err(anyhow::Error::from)?;

    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_as_flat_counts() {
        let stats = DashboardStats {
            users: 10,
            courses: 4,
            categories: 2,
            enrollments: 25,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["users"], 10);
        assert_eq!(json["enrollments"], 25);
    }
}
