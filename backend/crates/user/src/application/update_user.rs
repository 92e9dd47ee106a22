//! Update User Use Case
//!
//! Edits a user's profile and, optionally, their password.

use kernel::id::UserUuid;
use platform::password::CredentialHasher;
use std::sync::Arc;

use crate::domain::entity::user::{UserProfile, UserUpdate};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{UserError, UserResult};

/// Update input
pub struct UpdateUserInput {
    pub name: String,
    pub user_name: String,
    pub email: String,
    /// `None` keeps the current password
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub phone_number: String,
}

/// Update user use case
pub struct UpdateUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: Arc<CredentialHasher>,
}

impl<U> UpdateUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, hasher: Arc<CredentialHasher>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn execute(&self, uuid: &UserUuid, input: UpdateUserInput) -> UserResult<UserProfile> {
        let current = self
            .user_repo
            .find_by_uuid(uuid)
            .await?
            .ok_or(UserError::UserNotFound)?;

        if input.user_name != current.user_name {
            if let Some(other) = self.user_repo.find_by_user_name(&input.user_name).await? {
                if other.id != current.id {
                    return Err(UserError::UsernameExists);
                }
            }
        }

        if input.email != current.email {
            if let Some(other) = self.user_repo.find_by_email(&input.email).await? {
                if other.id != current.id {
                    return Err(UserError::EmailExists);
                }
            }
        }

        let password = match input.password {
            Some(password) => {
                if input.confirm_password.as_deref() != Some(password.as_str()) {
                    return Err(UserError::PasswordDoesNotMatch);
                }
                let raw_password = RawPassword::new(password, "password")?;
                Some(UserPassword::from_raw(&raw_password, &self.hasher)?)
            }
            None => None,
        };

        let password_changed = password.is_some();

        let changes = UserUpdate {
            name: input.name,
            user_name: input.user_name,
            email: input.email,
            phone_number: input.phone_number,
            password,
        };

        if !self.user_repo.update(uuid, &changes).await? {
            return Err(UserError::UserNotFound);
        }

        let user = self
            .user_repo
            .find_by_uuid(uuid)
            .await?
            .ok_or(UserError::UserNotFound)?;

        tracing::info!(uuid = %uuid, password_changed, "User updated");

        Ok(user.to_profile())
    }
}
