//! Get User Use Case
//!
//! Read-only profile lookups.

use kernel::id::UserUuid;
use std::sync::Arc;

use crate::application::session_token::AuthenticatedUser;
use crate::domain::entity::user::UserProfile;
use crate::domain::repository::UserRepository;
use crate::error::{UserError, UserResult};

pub struct GetUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Profile of the caller, straight from the verified token
    pub fn current(&self, caller: &AuthenticatedUser) -> UserProfile {
        caller.user.clone()
    }

    /// Lookup by public UUID; a malformed UUID is treated as unknown
    pub async fn by_uuid(&self, raw_uuid: &str) -> UserResult<UserProfile> {
        let uuid: UserUuid = raw_uuid.parse().map_err(|_| UserError::UserNotFound)?;

        let user = self
            .user_repo
            .find_by_uuid(&uuid)
            .await?
            .ok_or(UserError::UserNotFound)?;

        Ok(user.to_profile())
    }
}
