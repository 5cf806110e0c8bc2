use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::User;
use crate::error::ApiError;
use crate::profile::dto::ProfileResponse;
use crate::profile::repo::Profile;
use crate::validate::{is_valid_email, Violations};

/// Request body for user registration. Deliberately has no admin flag;
/// whatever extra fields a client sends are dropped by serde.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.ensure(
            self.username.trim().len() >= 3,
            "username",
            "Username must be at least 3 characters",
        );
        v.ensure(
            self.password.len() >= 6,
            "password",
            "Password must be at least 6 characters",
        );
        if let Some(email) = &self.email {
            v.ensure(
                is_valid_email(email.trim()),
                "email",
                "Please provide a valid email address",
            );
        }
        v.finish()
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public part of the user returned to the client, with the optional
/// profile embedded the way the dashboard expects it.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub has_completed_profile: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub profile: Option<ProfileResponse>,
}

impl UserResponse {
    pub fn from_user(user: User, profile: Option<Profile>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            has_completed_profile: user.has_completed_profile,
            created_at: user.created_at,
            profile: profile.map(ProfileResponse::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            username: "newuser".into(),
            password: "hunter22".into(),
            email: Some("new@example.com".into()),
        }
    }

    #[test]
    fn accepts_valid_registration() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn email_is_optional() {
        let req = RegisterRequest {
            email: None,
            ..valid_register()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_short_username_and_password_together() {
        let req = RegisterRequest {
            username: "ab".into(),
            password: "12345".into(),
            email: None,
        };
        match req.validate() {
            Err(ApiError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "username");
                assert_eq!(errors[1].field, "password");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_email() {
        let req = RegisterRequest {
            email: Some("nope".into()),
            ..valid_register()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_request_has_no_admin_escape_hatch() {
        // Unknown fields are silently dropped, so a client cannot smuggle
        // an admin flag through registration.
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"mallory","password":"secret1","isAdmin":true,"is_admin":true}"#,
        )
        .unwrap();
        assert_eq!(req.username, "mallory");
    }
}
