use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::profile::repo::Profile;
use crate::validate::Violations;

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub interest: Option<String>,
    pub profile_image_url: Option<String>,
}

impl ProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if let Some(name) = &self.full_name {
            v.ensure(
                name.trim().len() >= 2,
                "full_name",
                "Full name must be at least 2 characters",
            );
        }
        v.finish()
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub interest: Option<String>,
    pub profile_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            bio: p.bio,
            interest: p.interest,
            profile_image_url: p.profile_image_url,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_valid() {
        let req = ProfileRequest {
            full_name: None,
            bio: None,
            interest: None,
            profile_image_url: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn short_full_name_is_rejected() {
        let req = ProfileRequest {
            full_name: Some("x".into()),
            bio: None,
            interest: None,
            profile_image_url: None,
        };
        assert!(req.validate().is_err());
    }
}
