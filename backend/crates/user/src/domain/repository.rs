//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserUuid;

use crate::domain::entity::{
    role::Role,
    user::{NewUser, User, UserUpdate},
};
use crate::error::UserResult;

/// User repository trait
///
/// Every `find_*` loads the user together with its role.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user, returning its surrogate id
    async fn create(&self, user: &NewUser) -> UserResult<i64>;

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;

    async fn find_by_uuid(&self, uuid: &UserUuid) -> UserResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn find_by_user_name(&self, user_name: &str) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Apply profile changes; returns false when no row matched
    async fn update(&self, uuid: &UserUuid, changes: &UserUpdate) -> UserResult<bool>;
}

/// Role repository trait
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository {
    async fn find_by_code(&self, code: &str) -> UserResult<Option<Role>>;
}
