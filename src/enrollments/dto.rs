use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::categories::dto::CategorySummary;
use crate::enrollments::repo::{Enrollment, EnrollmentWithCourseRow};
use crate::error::ApiError;
use crate::validate::Violations;

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub progress: i32,
}

impl ProgressRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.ensure(
            (0..=100).contains(&self.progress),
            "progress",
            "Progress must be between 0 and 100",
        );
        v.finish()
    }
}

/// Answer for "am I enrolled in this course?".
#[derive(Debug, Serialize)]
pub struct EnrollmentStatusResponse {
    pub enrolled: bool,
    pub enrollment: Option<Enrollment>,
}

/// Compact course shape shown on the "my courses" page.
#[derive(Debug, Serialize)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub image_url: String,
    pub duration: String,
    pub lesson_count: i32,
    pub rating: Option<Decimal>,
    pub review_count: i32,
    pub category: CategorySummary,
}

#[derive(Debug, Serialize)]
pub struct EnrolledCourseResponse {
    pub id: Uuid,
    pub progress: i32,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub course: CourseSummary,
}

impl From<EnrollmentWithCourseRow> for EnrolledCourseResponse {
    fn from(row: EnrollmentWithCourseRow) -> Self {
        Self {
            id: row.id,
            progress: row.progress,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
            course: CourseSummary {
                id: row.course_id,
                title: row.course_title,
                slug: row.course_slug,
                image_url: row.course_image_url,
                duration: row.course_duration,
                lesson_count: row.course_lesson_count,
                rating: row.course_rating,
                review_count: row.course_review_count,
                category: CategorySummary {
                    id: row.category_id,
                    name: row.category_name,
                    slug: row.category_slug,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bounds_are_inclusive() {
        assert!(ProgressRequest { progress: 0 }.validate().is_ok());
        assert!(ProgressRequest { progress: 100 }.validate().is_ok());
        assert!(ProgressRequest { progress: 55 }.validate().is_ok());
    }

    #[test]
    fn out_of_range_progress_is_rejected() {
        for bad in [-1, 101, 1000] {
            match (ProgressRequest { progress: bad }).validate() {
                Err(ApiError::Validation(errors)) => assert_eq!(errors[0].field, "progress"),
                other => panic!("expected validation error for {bad}, got {other:?}"),
            }
        }
    }
}
