//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    role::Role,
    user::{NewUser, User, UserProfile, UserUpdate},
};
pub use repository::{RoleRepository, UserRepository};
