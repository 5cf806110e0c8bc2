use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub duration: String,
    pub course_id: Uuid,
    pub position: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Recomputes the denormalized lesson counter from scratch inside the
/// caller's transaction. A single statement, so concurrent writers cannot
/// interleave between read and write, and any out-of-band drift heals.
async fn recompute_lesson_count(
    tx: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE courses
        SET lesson_count = (SELECT count(*)::int FROM lessons WHERE course_id = $1),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(course_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

impl Lesson {
    pub async fn list_by_course(db: &PgPool, course_id: Uuid) -> anyhow::Result<Vec<Lesson>> {
        let rows = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, title, description, content, video_url, duration, course_id, position,
                   created_at, updated_at
            FROM lessons
            WHERE course_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, title, description, content, video_url, duration, course_id, position,
                   created_at, updated_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(lesson)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        course_id: Uuid,
        title: &str,
        description: &str,
        content: Option<&str>,
        video_url: Option<&str>,
        duration: &str,
        position: i32,
    ) -> anyhow::Result<Lesson> {
        let mut tx = db.begin().await?;
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (course_id, title, description, content, video_url, duration, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, content, video_url, duration, course_id, position,
                      created_at, updated_at
            "#,
        )
        .bind(course_id)
        .bind(title)
        .bind(description)
        .bind(content)
        .bind(video_url)
        .bind(duration)
        .bind(position)
        .fetch_one(&mut *tx)
        .await?;
        recompute_lesson_count(&mut tx, course_id).await?;
        tx.commit().await?;
        Ok(lesson)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: &str,
        description: &str,
        content: Option<&str>,
        video_url: Option<&str>,
        duration: &str,
        position: i32,
    ) -> anyhow::Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons
            SET title = $2, description = $3, content = $4, video_url = $5, duration = $6,
                position = $7, updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, content, video_url, duration, course_id, position,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(content)
        .bind(video_url)
        .bind(duration)
        .bind(position)
        .fetch_one(db)
        .await?;
        Ok(lesson)
    }

    pub async fn delete(db: &PgPool, lesson: &Lesson) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson.id)
            .execute(&mut *tx)
            .await?;
        recompute_lesson_count(&mut tx, lesson.course_id).await?;
        tx.commit().await?;
        Ok(())
    }
}
