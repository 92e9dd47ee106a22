//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod get_user;
pub mod login;
pub mod register;
pub mod service_signature;
pub mod session_token;
pub mod update_user;

// Re-exports
pub use config::UserConfig;
pub use get_user::GetUserUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use service_signature::{ServiceSignatureValidator, compute_signature};
pub use session_token::{AuthenticatedUser, IssuedToken, SessionClaims, SessionTokenService};
pub use update_user::{UpdateUserInput, UpdateUserUseCase};
