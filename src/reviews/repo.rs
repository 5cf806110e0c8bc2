use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub rating: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Review joined with its author for public listings.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithAuthorRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_username: String,
    pub author_full_name: Option<String>,
}

/// Refreshes the course's rating/review_count aggregates from scratch inside
/// the caller's transaction. One statement: the average (mean over all
/// reviews, rounded to one decimal, null when none remain) and the count are
/// computed by the database, so concurrent review writes cannot leave a
/// stale value behind.
async fn recompute_course_rating(
    tx: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE courses
        SET rating = (SELECT round(avg(rating), 1) FROM reviews WHERE course_id = $1),
            review_count = (SELECT count(*)::int FROM reviews WHERE course_id = $1),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(course_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

impl Review {
    pub async fn list_for_course(
        db: &PgPool,
        course_id: Uuid,
    ) -> anyhow::Result<Vec<ReviewWithAuthorRow>> {
        let rows = sqlx::query_as::<_, ReviewWithAuthorRow>(
            r#"
            SELECT r.id, r.user_id, r.course_id, r.title, r.content, r.rating,
                   r.created_at, r.updated_at,
                   u.username AS author_username, p.full_name AS author_full_name
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE r.course_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, course_id, title, content, rating, created_at, updated_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(review)
    }

    /// Persists a review and refreshes the course aggregates in one
    /// transaction. Under the single-review policy a resubmission replaces
    /// the author's existing row instead of stacking a new one.
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        course_id: Uuid,
        title: &str,
        content: &str,
        rating: i32,
        allow_multiple: bool,
    ) -> anyhow::Result<Review> {
        let mut tx = db.begin().await?;

        let existing: Option<(Uuid,)> = if allow_multiple {
            None
        } else {
            sqlx::query_as("SELECT id FROM reviews WHERE user_id = $1 AND course_id = $2")
                .bind(user_id)
                .bind(course_id)
                .fetch_optional(&mut *tx)
                .await?
        };

        let review = match existing {
            Some((id,)) => {
                sqlx::query_as::<_, Review>(
                    r#"
                    UPDATE reviews
                    SET title = $2, content = $3, rating = $4, updated_at = now()
                    WHERE id = $1
                    RETURNING id, user_id, course_id, title, content, rating, created_at, updated_at
                    "#,
                )
                .bind(id)
                .bind(title)
                .bind(content)
                .bind(rating)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, Review>(
                    r#"
                    INSERT INTO reviews (user_id, course_id, title, content, rating)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id, user_id, course_id, title, content, rating, created_at, updated_at
                    "#,
                )
                .bind(user_id)
                .bind(course_id)
                .bind(title)
                .bind(content)
                .bind(rating)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        recompute_course_rating(&mut tx, course_id).await?;
        tx.commit().await?;
        Ok(review)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        course_id: Uuid,
        title: &str,
        content: &str,
        rating: i32,
    ) -> anyhow::Result<Review> {
        let mut tx = db.begin().await?;
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET title = $2, content = $3, rating = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, course_id, title, content, rating, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(rating)
        .fetch_one(&mut *tx)
        .await?;
        recompute_course_rating(&mut tx, course_id).await?;
        tx.commit().await?;
        Ok(review)
    }

    pub async fn delete(db: &PgPool, review: &Review) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review.id)
            .execute(&mut *tx)
            .await?;
        recompute_course_rating(&mut tx, review.course_id).await?;
        tx.commit().await?;
        Ok(())
    }
}
