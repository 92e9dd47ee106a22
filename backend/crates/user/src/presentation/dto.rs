//! API DTOs (Data Transfer Objects)
//!
//! Missing fields deserialize to empty values so that they are reported as
//! field validation errors rather than as a malformed body.

use serde::Deserialize;
use validator::Validate;

use crate::application::{LoginInput, RegisterInput, UpdateUserInput};

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl From<LoginRequest> for LoginInput {
    fn from(req: LoginRequest) -> Self {
        Self {
            user_name: req.username,
            password: req.password,
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 30, message = "username must be 1 to 30 characters"))]
    pub username: String,
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 100, message = "email must be at most 100 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "confirmPassword is required"))]
    pub confirm_password: String,
    #[validate(length(min = 1, max = 15, message = "phoneNumber must be 1 to 15 characters"))]
    pub phone_number: String,
    #[serde(rename = "roleID")]
    pub role_id: Option<i32>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            user_name: req.username,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            phone_number: req.phone_number,
            role_id: req.role_id,
        }
    }
}

// ============================================================================
// Update
// ============================================================================

/// Update request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 30, message = "username must be 1 to 30 characters"))]
    pub username: String,
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 100, message = "email must be at most 100 characters")
    )]
    pub email: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    #[validate(length(min = 1, max = 15, message = "phoneNumber must be 1 to 15 characters"))]
    pub phone_number: String,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            user_name: req.username,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            phone_number: req.phone_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_keys() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{
                "name": "Alice",
                "username": "alice",
                "email": "alice@example.com",
                "password": "Secret1",
                "confirmPassword": "Secret1",
                "phoneNumber": "0812345678",
                "roleID": 1
            }"#,
        )
        .unwrap();

        assert_eq!(req.confirm_password, "Secret1");
        assert_eq!(req.phone_number, "0812345678");
        assert_eq!(req.role_id, Some(1));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_fail_validation() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();

        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_invalid_email() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            username: "alice".to_string(),
            email: "not-an-email".to_string(),
            password: "Secret1".to_string(),
            confirm_password: "Secret1".to_string(),
            phone_number: "0812345678".to_string(),
            role_id: None,
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().keys().any(|k| k.to_string() == "email"));
    }

    #[test]
    fn test_fields_bounded_by_column_sizes() {
        let req = RegisterRequest {
            name: "a".repeat(101),
            username: "a".repeat(31),
            email: format!("{}@example.com", "a".repeat(90)),
            password: "Secret1".to_string(),
            confirm_password: "Secret1".to_string(),
            phone_number: "0".repeat(16),
            role_id: None,
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 4);
        assert!(fields.keys().any(|k| k.to_string() == "username"));
        assert!(fields.keys().any(|k| k.to_string() == "email"));

        let at_limit = RegisterRequest {
            name: "a".repeat(100),
            username: "a".repeat(30),
            email: format!("{}@example.com", "a".repeat(60)),
            phone_number: "0".repeat(15),
            ..req
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_update_password_is_optional() {
        let req: UpdateUserRequest = serde_json::from_str(
            r#"{
                "name": "Alice",
                "username": "alice",
                "email": "alice@example.com",
                "phoneNumber": "0812345678"
            }"#,
        )
        .unwrap();

        assert!(req.password.is_none());
        assert!(req.validate().is_ok());
    }
}
