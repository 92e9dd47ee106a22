//! User Account Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, session tokens, service signatures
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Login with username + password, returning a signed session token
//! - Self-registration (always as a customer)
//! - Profile lookup and update
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Stateless HS256 session tokens carrying the public profile
//! - Protected routes additionally require a SHA-256 service signature
//! - Per-client fixed-window rate limiting on every route

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::UserConfig;
pub use error::{FieldError, UserError, UserResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::user_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
