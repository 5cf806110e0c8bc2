use serde::Deserialize;

use crate::error::ApiError;
use crate::validate::Violations;

#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub duration: String,
    pub position: i32,
}

fn check_lesson_fields(
    v: &mut Violations,
    title: Option<&str>,
    description: Option<&str>,
    duration: Option<&str>,
    position: Option<i32>,
) {
    if let Some(title) = title {
        v.ensure(
            title.trim().len() >= 3,
            "title",
            "Title must be at least 3 characters",
        );
    }
    if let Some(description) = description {
        v.ensure(
            description.trim().len() >= 10,
            "description",
            "Description must be at least 10 characters",
        );
    }
    if let Some(duration) = duration {
        v.ensure(
            !duration.trim().is_empty(),
            "duration",
            "Duration is required",
        );
    }
    if let Some(position) = position {
        v.ensure(position >= 1, "position", "Position must be 1 or greater");
    }
}

impl CreateLessonRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        check_lesson_fields(
            &mut v,
            Some(&self.title),
            Some(&self.description),
            Some(&self.duration),
            Some(self.position),
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<String>,
    pub position: Option<i32>,
}

impl UpdateLessonRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        check_lesson_fields(
            &mut v,
            self.title.as_deref(),
            self.description.as_deref(),
            self.duration.as_deref(),
            self.position,
        );
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateLessonRequest {
        CreateLessonRequest {
            title: "Ownership".into(),
            description: "Moves, borrows and lifetimes".into(),
            content: None,
            video_url: Some("https://videos.example.com/ownership.mp4".into()),
            duration: "25 min".into(),
            position: 1,
        }
    }

    #[test]
    fn valid_lesson_passes() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn zero_position_is_rejected() {
        let req = CreateLessonRequest {
            position: 0,
            ..valid_create()
        };
        match req.validate() {
            Err(ApiError::Validation(errors)) => assert_eq!(errors[0].field, "position"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn short_title_is_rejected() {
        let req = CreateLessonRequest {
            title: "ab".into(),
            ..valid_create()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_validates_only_present_fields() {
        let req = UpdateLessonRequest {
            title: None,
            description: None,
            content: None,
            video_url: None,
            duration: None,
            position: Some(-1),
        };
        assert!(req.validate().is_err());
    }
}
