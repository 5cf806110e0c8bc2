use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub progress: i32,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Enrollment joined with its course and the course's category, for the
/// "my courses" listing.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentWithCourseRow {
    pub id: Uuid,
    pub progress: i32,
    pub completed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub course_id: Uuid,
    pub course_title: String,
    pub course_slug: String,
    pub course_image_url: String,
    pub course_duration: String,
    pub course_lesson_count: i32,
    pub course_rating: Option<Decimal>,
    pub course_review_count: i32,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_slug: String,
}

impl Enrollment {
    pub async fn find(
        db: &PgPool,
        user_id: Uuid,
        course_id: Uuid,
    ) -> anyhow::Result<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, user_id, course_id, progress, completed, created_at, updated_at
            FROM enrollments
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;
        Ok(enrollment)
    }

    pub async fn is_enrolled(db: &PgPool, user_id: Uuid, course_id: Uuid) -> anyhow::Result<bool> {
        Ok(Self::find(db, user_id, course_id).await?.is_some())
    }

    /// Idempotent: re-enrolling hands back the existing row. The unique
    /// (user_id, course_id) index backs this up against races.
    pub async fn get_or_create(
        db: &PgPool,
        user_id: Uuid,
        course_id: Uuid,
    ) -> anyhow::Result<Enrollment> {
        if let Some(existing) = Self::find(db, user_id, course_id).await? {
            return Ok(existing);
        }
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (user_id, course_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, course_id) DO UPDATE SET updated_at = enrollments.updated_at
            RETURNING id, user_id, course_id, progress, completed, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(db)
        .await?;
        Ok(enrollment)
    }

    /// One statement: progress and its derived `completed` flag can never
    /// disagree.
    pub async fn set_progress(
        db: &PgPool,
        user_id: Uuid,
        course_id: Uuid,
        progress: i32,
    ) -> anyhow::Result<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            UPDATE enrollments
            SET progress = $3, completed = ($3 = 100), updated_at = now()
            WHERE user_id = $1 AND course_id = $2
            RETURNING id, user_id, course_id, progress, completed, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(progress)
        .fetch_optional(db)
        .await?;
        Ok(enrollment)
    }

    pub async fn list_with_courses(
        db: &PgPool,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<EnrollmentWithCourseRow>> {
        let rows = sqlx::query_as::<_, EnrollmentWithCourseRow>(
            r#"
            SELECT e.id, e.progress, e.completed, e.created_at, e.updated_at,
                   c.id AS course_id, c.title AS course_title, c.slug AS course_slug,
                   c.image_url AS course_image_url, c.duration AS course_duration,
                   c.lesson_count AS course_lesson_count, c.rating AS course_rating,
                   c.review_count AS course_review_count,
                   cat.id AS category_id, cat.name AS category_name, cat.slug AS category_slug
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            JOIN categories cat ON cat.id = c.category_id
            WHERE e.user_id = $1
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
