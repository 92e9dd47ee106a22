//! User Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitStore};
use tower_http::catch_panic::CatchPanicLayer;

use crate::application::config::UserConfig;
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::error::UserResult;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, UserAppState};
use crate::presentation::middleware::{RateLimitState, authenticate, handle_panic, rate_limit};

/// Create the user router with PostgreSQL repository
///
/// `rate_limit_store` is shared with the caller so expired windows can be
/// pruned in the background.
pub fn user_router(
    repo: PgUserRepository,
    config: UserConfig,
    rate_limit_store: InMemoryRateLimitStore,
) -> UserResult<Router> {
    user_router_generic(repo, config, rate_limit_store)
}

/// Create a generic user router for any repository and rate limit store
pub fn user_router_generic<R, S>(repo: R, config: UserConfig, rate_limit_store: S) -> UserResult<Router>
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    let limiter = RateLimitState::new(rate_limit_store, config.rate_limit.clone());
    let state = UserAppState::new(repo, config)?;

    Ok(with_guards(routes(state), limiter))
}

/// Routes with the authentication gate applied to the protected group
fn routes<R>(state: UserAppState<R>) -> Router
where
    R: UserRepository + RoleRepository + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/users/me", get(handlers::get_user_login::<R>))
        .route(
            "/users/{uuid}",
            get(handlers::get_user_by_uuid::<R>).put(handlers::update_user::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_guard(),
            authenticate,
        ));

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/register", post(handlers::register::<R>))
        .merge(protected)
        .with_state(state)
}

/// Panic guard inside, rate limiter outermost
pub(crate) fn with_guards<S>(router: Router, limiter: RateLimitState<S>) -> Router
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(limiter, rate_limit::<S>))
}
