//! User Entity
//!
//! Core user record plus the public profile projection that travels in
//! responses and inside session tokens.

use chrono::{DateTime, Utc};
use kernel::id::UserUuid;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::role::Role;
use crate::domain::value_object::user_password::UserPassword;

/// User entity, as loaded together with its role
#[derive(Debug, Clone)]
pub struct User {
    /// Internal surrogate key
    pub id: i64,
    /// Public identifier used in URLs
    pub uuid: UserUuid,
    /// Display name
    pub name: String,
    /// Login name (unique, case-sensitive)
    pub user_name: String,
    /// Email address (unique)
    pub email: String,
    /// Argon2id hash, never the plaintext
    pub password: UserPassword,
    pub phone_number: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public profile with the role code lowercased
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            uuid: self.uuid.into_uuid(),
            name: self.name.clone(),
            user_name: self.user_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            role: self.role.normalized_code(),
        }
    }
}

/// Public user profile
///
/// Also the `user` claim of a session token, so the wire shape is shared
/// between HTTP responses and tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uuid: Uuid,
    pub name: String,
    #[serde(rename = "username")]
    pub user_name: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
}

/// Fields of a user about to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub user_name: String,
    pub email: String,
    pub password: UserPassword,
    pub phone_number: String,
    pub role_id: i32,
}

/// Changes applied by a profile update
///
/// `password` is `None` when the caller did not ask to change it, and the
/// stored hash is then left untouched.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub user_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: Option<UserPassword>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::{ClearTextPassword, CredentialHasher, PasswordHashParams};

    fn sample_user(role_code: &str) -> User {
        let hasher = CredentialHasher::new(PasswordHashParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let hash = hasher
            .hash(&ClearTextPassword::new("Secret1".to_string()).unwrap())
            .unwrap();
        let now = Utc::now();

        User {
            id: 1,
            uuid: UserUuid::new(),
            name: "Alice".to_string(),
            user_name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: UserPassword::from_phc_string(hash.as_phc_string()).unwrap(),
            phone_number: "0812345678".to_string(),
            role: Role::new(2, role_code),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_profile_lowercases_role() {
        let user = sample_user("Customer");
        let profile = user.to_profile();

        assert_eq!(profile.role, "customer");
        assert_eq!(profile.user_name, "alice");
        assert_eq!(&profile.uuid, user.uuid.as_uuid());
    }

    #[test]
    fn test_profile_wire_shape() {
        let profile = sample_user("admin").to_profile();
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["phoneNumber"], "0812345678");
        assert_eq!(json["role"], "admin");
        assert!(json.get("password").is_none());
    }
}
