//! Register Use Case
//!
//! Creates a new customer account.

use kernel::id::UserUuid;
use platform::password::CredentialHasher;
use std::sync::Arc;

use crate::domain::entity::user::{NewUser, UserProfile};
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::domain::value_object::user_role::UserRole;
use crate::error::{UserError, UserResult};

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
    /// Accepted from clients but never honoured
    pub role_id: Option<i32>,
}

/// Register use case
pub struct RegisterUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    user_repo: Arc<U>,
    role_repo: Arc<R>,
    hasher: Arc<CredentialHasher>,
}

impl<U, R> RegisterUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub fn new(user_repo: Arc<U>, role_repo: Arc<R>, hasher: Arc<CredentialHasher>) -> Self {
        Self {
            user_repo,
            role_repo,
            hasher,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> UserResult<UserProfile> {
        if self
            .user_repo
            .find_by_user_name(&input.user_name)
            .await?
            .is_some()
        {
            return Err(UserError::UsernameExists);
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::EmailExists);
        }

        if input.password != input.confirm_password {
            return Err(UserError::PasswordDoesNotMatch);
        }

        let raw_password = RawPassword::new(input.password, "password")?;
        let password = UserPassword::from_raw(&raw_password, &self.hasher)?;

        if let Some(requested) = input.role_id {
            tracing::debug!(role_id = requested, "Ignoring requested role on registration");
        }

        // Self-registration always yields a customer
        let role = self
            .role_repo
            .find_by_code(UserRole::Customer.code())
            .await?
            .ok_or(UserError::RoleNotFound)?;

        let new_user = NewUser {
            uuid: UserUuid::new(),
            name: input.name,
            user_name: input.user_name,
            email: input.email,
            password,
            phone_number: input.phone_number,
            role_id: role.id,
        };

        let id = self.user_repo.create(&new_user).await?;

        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(UserError::UserNotFound)?;

        tracing::info!(
            uuid = %user.uuid,
            user_name = %user.user_name,
            "User registered"
        );

        Ok(user.to_profile())
    }
}
