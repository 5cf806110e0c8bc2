use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Bare course row. `lesson_count`, `rating` and `review_count` are
/// denormalized aggregates owned by the lesson/review repositories; nothing
/// else may write them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub long_description: Option<String>,
    pub image_url: String,
    pub category_id: Uuid,
    pub instructor_id: Uuid,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub duration: String,
    pub lesson_count: i32,
    pub rating: Option<Decimal>,
    pub review_count: i32,
    pub learning_objectives: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub target_audience: Option<Vec<String>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Course joined with its category and instructor for read endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct CourseDetailRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub long_description: Option<String>,
    pub image_url: String,
    pub category_id: Uuid,
    pub instructor_id: Uuid,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub duration: String,
    pub lesson_count: i32,
    pub rating: Option<Decimal>,
    pub review_count: i32,
    pub learning_objectives: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub target_audience: Option<Vec<String>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub category_name: String,
    pub category_slug: String,
    pub instructor_username: String,
    pub instructor_full_name: Option<String>,
}

const DETAIL_SELECT: &str = r#"
SELECT c.id, c.title, c.slug, c.description, c.long_description, c.image_url,
       c.category_id, c.instructor_id, c.price, c.original_price, c.duration,
       c.lesson_count, c.rating, c.review_count, c.learning_objectives,
       c.requirements, c.target_audience, c.created_at, c.updated_at,
       cat.name AS category_name, cat.slug AS category_slug,
       u.username AS instructor_username, p.full_name AS instructor_full_name
FROM courses c
JOIN categories cat ON cat.id = c.category_id
JOIN users u ON u.id = c.instructor_id
LEFT JOIN profiles p ON p.user_id = u.id
"#;

/// Per-course dependent rows, used to gate destructive deletes.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct DependentCounts {
    pub lessons: i64,
    pub enrollments: i64,
    pub reviews: i64,
}

impl DependentCounts {
    pub fn total(&self) -> i64 {
        self.lessons + self.enrollments + self.reviews
    }
}

impl Course {
    pub async fn list_detail(db: &PgPool) -> anyhow::Result<Vec<CourseDetailRow>> {
        let sql = format!("{DETAIL_SELECT} ORDER BY c.created_at DESC");
        let rows = sqlx::query_as::<_, CourseDetailRow>(&sql)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    pub async fn find_detail(db: &PgPool, id: Uuid) -> anyhow::Result<Option<CourseDetailRow>> {
        let sql = format!("{DETAIL_SELECT} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CourseDetailRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    pub async fn list_by_category(
        db: &PgPool,
        category_id: Uuid,
    ) -> anyhow::Result<Vec<CourseDetailRow>> {
        let sql = format!("{DETAIL_SELECT} WHERE c.category_id = $1 ORDER BY c.created_at DESC");
        let rows = sqlx::query_as::<_, CourseDetailRow>(&sql)
            .bind(category_id)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, slug, description, long_description, image_url, category_id,
                   instructor_id, price, original_price, duration, lesson_count, rating,
                   review_count, learning_objectives, requirements, target_audience,
                   created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(course)
    }

    pub async fn exists(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row.is_some())
    }

    pub async fn slug_exists(
        db: &PgPool,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<bool> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM courses WHERE slug = $1 AND id IS DISTINCT FROM $2")
                .bind(slug)
                .bind(exclude)
                .fetch_optional(db)
                .await?;
        Ok(row.is_some())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        title: &str,
        slug: &str,
        description: &str,
        long_description: Option<&str>,
        image_url: &str,
        category_id: Uuid,
        instructor_id: Uuid,
        price: Option<Decimal>,
        original_price: Option<Decimal>,
        duration: &str,
        learning_objectives: Option<&[String]>,
        requirements: Option<&[String]>,
        target_audience: Option<&[String]>,
    ) -> anyhow::Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, slug, description, long_description, image_url,
                                 category_id, instructor_id, price, original_price, duration,
                                 learning_objectives, requirements, target_audience)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, title, slug, description, long_description, image_url, category_id,
                      instructor_id, price, original_price, duration, lesson_count, rating,
                      review_count, learning_objectives, requirements, target_audience,
                      created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(slug)
        .bind(description)
        .bind(long_description)
        .bind(image_url)
        .bind(category_id)
        .bind(instructor_id)
        .bind(price)
        .bind(original_price)
        .bind(duration)
        .bind(learning_objectives)
        .bind(requirements)
        .bind(target_audience)
        .fetch_one(db)
        .await?;
        Ok(course)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: &str,
        slug: &str,
        description: &str,
        long_description: Option<&str>,
        image_url: &str,
        category_id: Uuid,
        price: Option<Decimal>,
        original_price: Option<Decimal>,
        duration: &str,
        learning_objectives: Option<&[String]>,
        requirements: Option<&[String]>,
        target_audience: Option<&[String]>,
    ) -> anyhow::Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET title = $2, slug = $3, description = $4, long_description = $5, image_url = $6,
                category_id = $7, price = $8, original_price = $9, duration = $10,
                learning_objectives = $11, requirements = $12, target_audience = $13,
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, slug, description, long_description, image_url, category_id,
                      instructor_id, price, original_price, duration, lesson_count, rating,
                      review_count, learning_objectives, requirements, target_audience,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(slug)
        .bind(description)
        .bind(long_description)
        .bind(image_url)
        .bind(category_id)
        .bind(price)
        .bind(original_price)
        .bind(duration)
        .bind(learning_objectives)
        .bind(requirements)
        .bind(target_audience)
        .fetch_one(db)
        .await?;
        Ok(course)
    }

    pub async fn dependent_counts(db: &PgPool, id: Uuid) -> anyhow::Result<DependentCounts> {
        let counts = sqlx::query_as::<_, DependentCounts>(
            r#"
            SELECT (SELECT count(*) FROM lessons WHERE course_id = $1) AS lessons,
                   (SELECT count(*) FROM enrollments WHERE course_id = $1) AS enrollments,
                   (SELECT count(*) FROM reviews WHERE course_id = $1) AS reviews
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(counts)
    }

    /// Hard delete; lessons, enrollments and reviews follow via FK cascade.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
