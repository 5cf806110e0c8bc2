use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::reviews::repo::ReviewWithAuthorRow;
use crate::validate::Violations;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub title: String,
    pub content: String,
    pub rating: i32,
}

fn check_review_fields(
    v: &mut Violations,
    title: Option<&str>,
    content: Option<&str>,
    rating: Option<i32>,
) {
    if let Some(title) = title {
        v.ensure(
            title.trim().len() >= 3,
            "title",
            "Title must be at least 3 characters",
        );
    }
    if let Some(content) = content {
        v.ensure(
            content.trim().len() >= 10,
            "content",
            "Content must be at least 10 characters",
        );
    }
    if let Some(rating) = rating {
        v.ensure(
            (1..=5).contains(&rating),
            "rating",
            "Rating must be between 1 and 5",
        );
    }
}

impl CreateReviewRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        check_review_fields(
            &mut v,
            Some(&self.title),
            Some(&self.content),
            Some(self.rating),
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i32>,
}

impl UpdateReviewRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        check_review_fields(
            &mut v,
            self.title.as_deref(),
            self.content.as_deref(),
            self.rating,
        );
        v.finish()
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewAuthor {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub rating: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub user: ReviewAuthor,
}

impl From<ReviewWithAuthorRow> for ReviewResponse {
    fn from(row: ReviewWithAuthorRow) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            title: row.title,
            content: row.content,
            rating: row.rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: ReviewAuthor {
                id: row.user_id,
                username: row.author_username,
                full_name: row.author_full_name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateReviewRequest {
        CreateReviewRequest {
            title: "Great course".into(),
            content: "Clear explanations and useful exercises.".into(),
            rating: 5,
        }
    }

    #[test]
    fn valid_review_passes() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn rating_bounds_are_enforced() {
        for bad in [0, 6, -3] {
            let req = CreateReviewRequest {
                rating: bad,
                ..valid_create()
            };
            match req.validate() {
                Err(ApiError::Validation(errors)) => assert_eq!(errors[0].field, "rating"),
                other => panic!("expected validation error for {bad}, got {other:?}"),
            }
        }
        for ok in 1..=5 {
            let req = CreateReviewRequest {
                rating: ok,
                ..valid_create()
            };
            assert!(req.validate().is_ok());
        }
    }

    #[test]
    fn short_content_is_rejected() {
        let req = CreateReviewRequest {
            content: "meh".into(),
            ..valid_create()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        let req = UpdateReviewRequest {
            title: None,
            content: None,
            rating: None,
        };
        assert!(req.validate().is_ok());
    }
}
