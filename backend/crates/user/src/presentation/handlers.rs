//! HTTP Handlers

use axum::extract::{Path, State};
use kernel::id::UserUuid;
use kernel::response::ApiResponse;
use platform::password::CredentialHasher;
use std::sync::Arc;

use crate::application::config::UserConfig;
use crate::application::{
    AuthenticatedUser, GetUserUseCase, LoginUseCase, RegisterUseCase, ServiceSignatureValidator,
    SessionTokenService, UpdateUserUseCase,
};
use crate::domain::entity::user::UserProfile;
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::error::{UserError, UserResult};
use crate::presentation::dto::{LoginRequest, RegisterRequest, UpdateUserRequest};
use crate::presentation::extract::ValidatedJson;
use crate::presentation::middleware::AuthGuard;

/// Shared state for user handlers
pub struct UserAppState<R>
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub hasher: Arc<CredentialHasher>,
    pub tokens: Arc<SessionTokenService>,
    pub signatures: Arc<ServiceSignatureValidator>,
}

impl<R> UserAppState<R>
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
{
    /// Build the hasher, token and signature services from `config`
    pub fn new(repo: R, config: UserConfig) -> UserResult<Self> {
        let hasher = CredentialHasher::new(config.password_hash)
            .map_err(|e| UserError::Internal(e.to_string()))?;
        let tokens = SessionTokenService::new(&config.jwt_secret, config.token_ttl);
        let signatures =
            ServiceSignatureValidator::new(config.signature_key.clone(), config.signature_tolerance);

        Ok(Self {
            repo: Arc::new(repo),
            hasher: Arc::new(hasher),
            tokens: Arc::new(tokens),
            signatures: Arc::new(signatures),
        })
    }

    pub fn auth_guard(&self) -> AuthGuard {
        AuthGuard {
            tokens: self.tokens.clone(),
            signatures: self.signatures.clone(),
        }
    }
}

// Manual impl: only the Arcs are cloned, `R` itself need not be Clone
impl<R> Clone for UserAppState<R>
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            hasher: self.hasher.clone(),
            tokens: self.tokens.clone(),
            signatures: self.signatures.clone(),
        }
    }
}

// ============================================================================
// Public
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<UserAppState<R>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> UserResult<ApiResponse<UserProfile>>
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.tokens.clone(),
    );

    let output = use_case.execute(req.into()).await?;

    Ok(ApiResponse::success(output.profile).with_token(output.token))
}

/// POST /register
pub async fn register<R>(
    State(state): State<UserAppState<R>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> UserResult<ApiResponse<UserProfile>>
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.hasher.clone(),
    );

    let profile = use_case.execute(req.into()).await?;

    Ok(ApiResponse::success(profile))
}

// ============================================================================
// Protected (behind `authenticate`)
// ============================================================================

/// GET /users/me
pub async fn get_user_login<R>(
    State(state): State<UserAppState<R>>,
    caller: AuthenticatedUser,
) -> UserResult<ApiResponse<UserProfile>>
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
{
    let use_case = GetUserUseCase::new(state.repo.clone());

    Ok(ApiResponse::success(use_case.current(&caller)))
}

/// GET /users/{uuid}
pub async fn get_user_by_uuid<R>(
    State(state): State<UserAppState<R>>,
    Path(uuid): Path<String>,
) -> UserResult<ApiResponse<UserProfile>>
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
{
    let use_case = GetUserUseCase::new(state.repo.clone());

    let profile = use_case.by_uuid(&uuid).await?;

    Ok(ApiResponse::success(profile))
}

/// PUT /users/{uuid}
pub async fn update_user<R>(
    State(state): State<UserAppState<R>>,
    caller: AuthenticatedUser,
    Path(uuid): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> UserResult<ApiResponse<UserProfile>>
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
{
    let uuid: UserUuid = uuid.parse().map_err(|_| UserError::UserNotFound)?;

    tracing::debug!(caller = %caller.user.uuid, target = %uuid, "Update requested");

    let use_case = UpdateUserUseCase::new(state.repo.clone(), state.hasher.clone());

    let profile = use_case.execute(&uuid, req.into()).await?;

    Ok(ApiResponse::success(profile))
}
