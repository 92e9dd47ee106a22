//! Login Use Case
//!
//! Checks a username/password pair and issues a session token.

use platform::password::CredentialHasher;
use std::sync::Arc;

use crate::application::session_token::SessionTokenService;
use crate::domain::entity::user::UserProfile;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_password::RawPassword;
use crate::error::{UserError, UserResult};

/// Login input
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub profile: UserProfile,
    pub token: String,
    /// Token expiry, unix seconds
    pub expires_at: i64,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: Arc<CredentialHasher>,
    tokens: Arc<SessionTokenService>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        hasher: Arc<CredentialHasher>,
        tokens: Arc<SessionTokenService>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> UserResult<LoginOutput> {
        let raw_password = RawPassword::new(input.password, "password")
            .map_err(|_| UserError::InvalidCredentials)?;

        let user = match self.user_repo.find_by_user_name(&input.user_name).await? {
            Some(user) => user,
            None => {
                self.hasher.verify_absent(raw_password.inner());
                tracing::debug!(user_name = %input.user_name, "Login for unknown user");
                return Err(UserError::InvalidCredentials);
            }
        };

        if !user.password.verify(&raw_password, &self.hasher) {
            tracing::debug!(uuid = %user.uuid, "Login with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let profile = user.to_profile();
        let issued = self.tokens.issue(&profile)?;

        tracing::info!(
            uuid = %user.uuid,
            role = %profile.role,
            expires_at = issued.expires_at,
            "User logged in"
        );

        Ok(LoginOutput {
            profile,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}
