use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub telegram_username: Option<String>,
    pub purpose: String,
    pub message: String,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ContactSubmission {
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        telegram_username: Option<&str>,
        purpose: &str,
        message: &str,
    ) -> anyhow::Result<ContactSubmission> {
        let submission = sqlx::query_as::<_, ContactSubmission>(
            r#"
            INSERT INTO contact_submissions (name, email, telegram_username, purpose, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, telegram_username, purpose, message, is_read, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(telegram_username)
        .bind(purpose)
        .bind(message)
        .fetch_one(db)
        .await?;
        Ok(submission)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<ContactSubmission>> {
        let rows = sqlx::query_as::<_, ContactSubmission>(
            r#"
            SELECT id, name, email, telegram_username, purpose, message, is_read, created_at
            FROM contact_submissions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<ContactSubmission>> {
        let submission = sqlx::query_as::<_, ContactSubmission>(
            r#"
            SELECT id, name, email, telegram_username, purpose, message, is_read, created_at
            FROM contact_submissions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(submission)
    }

    pub async fn mark_read(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE contact_submissions SET is_read = true WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM contact_submissions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
