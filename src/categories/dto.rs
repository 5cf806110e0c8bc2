use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::validate::Violations;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.ensure(
            self.name.trim().len() >= 2,
            "name",
            "Name must be at least 2 characters",
        );
        v.ensure(
            self.description.trim().len() >= 10,
            "description",
            "Description must be at least 10 characters",
        );
        v.ensure(
            !self.image_url.trim().is_empty(),
            "image_url",
            "Image URL is required",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if let Some(name) = &self.name {
            v.ensure(
                name.trim().len() >= 2,
                "name",
                "Name must be at least 2 characters",
            );
        }
        if let Some(description) = &self.description {
            v.ensure(
                description.trim().len() >= 10,
                "description",
                "Description must be at least 10 characters",
            );
        }
        if let Some(image_url) = &self.image_url {
            v.ensure(
                !image_url.trim().is_empty(),
                "image_url",
                "Image URL is required",
            );
        }
        v.finish()
    }
}

/// Compact shape for embedding a category under a course or enrollment.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Shared by the category/course delete endpoints: destructive deletes are
/// refused until the client resends with `?confirm=true`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_description_and_image() {
        let req = CreateCategoryRequest {
            name: "x".into(),
            description: "too short".into(),
            image_url: "  ".into(),
        };
        match req.validate() {
            Err(ApiError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["name", "description", "image_url"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_create_passes() {
        let req = CreateCategoryRequest {
            name: "Web Development".into(),
            description: "Everything about building for the web".into(),
            image_url: "https://cdn.example.com/web.png".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_only_checks_present_fields() {
        let req = UpdateCategoryRequest {
            name: None,
            description: None,
            image_url: None,
        };
        assert!(req.validate().is_ok());

        let req = UpdateCategoryRequest {
            name: Some("a".into()),
            description: None,
            image_url: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn delete_params_default_to_unconfirmed() {
        let params: DeleteParams = serde_json::from_str("{}").unwrap();
        assert!(!params.confirm);
    }
}
