use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Zero-or-one profile per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub interest: Option<String>,
    pub profile_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Profile {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, full_name, bio, interest, profile_image_url, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Insert-or-update keyed on the user. Absent fields keep their stored
    /// values, matching the partial-update semantics of the dashboard form.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        full_name: Option<&str>,
        bio: Option<&str>,
        interest: Option<&str>,
        profile_image_url: Option<&str>,
    ) -> anyhow::Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, full_name, bio, interest, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                full_name = COALESCE(EXCLUDED.full_name, profiles.full_name),
                bio = COALESCE(EXCLUDED.bio, profiles.bio),
                interest = COALESCE(EXCLUDED.interest, profiles.interest),
                profile_image_url = COALESCE(EXCLUDED.profile_image_url, profiles.profile_image_url),
                updated_at = now()
            RETURNING id, user_id, full_name, bio, interest, profile_image_url, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(bio)
        .bind(interest)
        .bind(profile_image_url)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }
}
