use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::categories::dto::CategorySummary;
use crate::courses::repo::CourseDetailRow;
use crate::error::ApiError;
use crate::validate::Violations;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub image_url: String,
    pub category_id: Uuid,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub duration: String,
    pub learning_objectives: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub target_audience: Option<Vec<String>>,
}

fn check_course_fields(
    v: &mut Violations,
    title: Option<&str>,
    description: Option<&str>,
    image_url: Option<&str>,
    duration: Option<&str>,
    price: Option<Decimal>,
    original_price: Option<Decimal>,
) {
    if let Some(title) = title {
        v.ensure(
            title.trim().len() >= 5,
            "title",
            "Title must be at least 5 characters",
        );
    }
    if let Some(description) = description {
        v.ensure(
            description.trim().len() >= 10,
            "description",
            "Description must be at least 10 characters",
        );
    }
    if let Some(image_url) = image_url {
        v.ensure(
            !image_url.trim().is_empty(),
            "image_url",
            "Image URL is required",
        );
    }
    if let Some(duration) = duration {
        v.ensure(
            !duration.trim().is_empty(),
            "duration",
            "Duration is required",
        );
    }
    if let Some(price) = price {
        v.ensure(price >= Decimal::ZERO, "price", "Price cannot be negative");
    }
    if let Some(original_price) = original_price {
        v.ensure(
            original_price >= Decimal::ZERO,
            "original_price",
            "Original price cannot be negative",
        );
    }
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        check_course_fields(
            &mut v,
            Some(&self.title),
            Some(&self.description),
            Some(&self.image_url),
            Some(&self.duration),
            self.price,
            self.original_price,
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub duration: Option<String>,
    pub learning_objectives: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub target_audience: Option<Vec<String>>,
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        check_course_fields(
            &mut v,
            self.title.as_deref(),
            self.description.as_deref(),
            self.image_url.as_deref(),
            self.duration.as_deref(),
            self.price,
            self.original_price,
        );
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructorSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub long_description: Option<String>,
    pub image_url: String,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub duration: String,
    pub lesson_count: i32,
    pub rating: Option<Decimal>,
    pub review_count: i32,
    pub learning_objectives: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub target_audience: Option<Vec<String>>,
    pub category: CategorySummary,
    pub instructor: InstructorSummary,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<CourseDetailRow> for CourseResponse {
    fn from(row: CourseDetailRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            long_description: row.long_description,
            image_url: row.image_url,
            price: row.price,
            original_price: row.original_price,
            duration: row.duration,
            lesson_count: row.lesson_count,
            rating: row.rating,
            review_count: row.review_count,
            learning_objectives: row.learning_objectives,
            requirements: row.requirements,
            target_audience: row.target_audience,
            category: CategorySummary {
                id: row.category_id,
                name: row.category_name,
                slug: row.category_slug,
            },
            instructor: InstructorSummary {
                id: row.instructor_id,
                username: row.instructor_username,
                full_name: row.instructor_full_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateCourseRequest {
        CreateCourseRequest {
            title: "Rust for Backend Engineers".into(),
            description: "From ownership to production services".into(),
            long_description: None,
            image_url: "https://cdn.example.com/rust.png".into(),
            category_id: Uuid::new_v4(),
            price: Some(Decimal::new(4999, 2)),
            original_price: None,
            duration: "12 hours".into(),
            learning_objectives: Some(vec!["Build an API".into()]),
            requirements: None,
            target_audience: None,
        }
    }

    #[test]
    fn valid_course_passes() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn short_title_is_rejected() {
        let req = CreateCourseRequest {
            title: "Rust".into(),
            ..valid_create()
        };
        match req.validate() {
            Err(ApiError::Validation(errors)) => assert_eq!(errors[0].field, "title"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        let req = CreateCourseRequest {
            price: Some(Decimal::new(-100, 2)),
            ..valid_create()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_ignores_absent_fields() {
        let req = UpdateCourseRequest {
            title: None,
            description: None,
            long_description: None,
            image_url: None,
            category_id: None,
            price: None,
            original_price: None,
            duration: None,
            learning_objectives: None,
            requirements: None,
            target_audience: None,
        };
        assert!(req.validate().is_ok());
    }
}
