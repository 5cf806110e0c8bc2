use serde::Deserialize;

use crate::error::ApiError;
use crate::validate::{is_valid_email, Violations};

/// Accepted values for the `purpose` field.
pub const PURPOSES: [&str; 4] = ["become_admin", "share_course", "copyright", "other"];

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub telegram_username: Option<String>,
    pub purpose: String,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.ensure(
            self.name.trim().len() >= 2,
            "name",
            "Name must be at least 2 characters",
        );
        v.ensure(
            is_valid_email(self.email.trim()),
            "email",
            "Please provide a valid email address",
        );
        v.ensure(
            PURPOSES.contains(&self.purpose.as_str()),
            "purpose",
            "Purpose must be one of: become admin, share course, copyright, or other",
        );
        v.ensure(
            self.message.trim().len() >= 10,
            "message",
            "Message must be at least 10 characters",
        );
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ContactRequest {
        ContactRequest {
            name: "Jamie".into(),
            email: "jamie@example.com".into(),
            telegram_username: Some("@jamie".into()),
            purpose: "share_course".into(),
            message: "I would like to publish my course here.".into(),
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn every_known_purpose_is_accepted() {
        for purpose in PURPOSES {
            let req = ContactRequest {
                purpose: purpose.into(),
                ..valid_request()
            };
            assert!(req.validate().is_ok(), "purpose {purpose} should pass");
        }
    }

    #[test]
    fn unknown_purpose_is_rejected() {
        let req = ContactRequest {
            purpose: "spam".into(),
            ..valid_request()
        };
        match req.validate() {
            Err(ApiError::Validation(errors)) => assert_eq!(errors[0].field, "purpose"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn bad_email_and_short_message_are_both_reported() {
        let req = ContactRequest {
            email: "nope".into(),
            message: "hi".into(),
            ..valid_request()
        };
        match req.validate() {
            Err(ApiError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["email", "message"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
