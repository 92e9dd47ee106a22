//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extract::ValidatedJson;
pub use handlers::UserAppState;
pub use middleware::{AuthGuard, RateLimitState, authenticate, handle_panic, rate_limit};
pub use router::{user_router, user_router_generic};
