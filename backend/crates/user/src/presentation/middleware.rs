//! User Middleware
//!
//! Request gates, outermost first: rate limiting, panic isolation, then
//! bearer token and service signature checks on protected routes.

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use platform::client::client_key;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitConfig, RateLimitStore};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::service_signature::ServiceSignatureValidator;
use crate::application::session_token::{AuthenticatedUser, SessionTokenService};
use crate::error::{UserError, UserResult};

// ============================================================================
// Rate Limiting
// ============================================================================

/// Middleware state for per-client throttling
#[derive(Clone)]
pub struct RateLimitState<S = InMemoryRateLimitStore>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    pub store: S,
    pub config: RateLimitConfig,
}

impl<S> RateLimitState<S>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    pub fn new(store: S, config: RateLimitConfig) -> Self {
        Self { store, config }
    }
}

/// Reject with 429 once the caller's window budget is spent
pub async fn rate_limit<S>(
    State(state): State<RateLimitState<S>>,
    req: Request,
    next: Next,
) -> UserResult<Response>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    let key = client_key(req.headers(), direct_ip, state.config.trust_forwarded_for);

    let result = state
        .store
        .check_and_increment(&key, &state.config)
        .await
        .map_err(|e| UserError::Internal(format!("Rate limit store failed: {}", e)))?;

    if !result.allowed {
        tracing::debug!(client = %key, reset_at_ms = result.reset_at_ms, "Request throttled");
        return Err(UserError::TooManyRequests);
    }

    Ok(next.run(req).await)
}

// ============================================================================
// Panic Guard
// ============================================================================

/// Response for a handler that panicked, used with `CatchPanicLayer::custom`
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "Request handler panicked");

    AppError::internal("internal server error").into_response()
}

// ============================================================================
// Authentication
// ============================================================================

/// Middleware state for protected routes
#[derive(Clone)]
pub struct AuthGuard {
    pub tokens: Arc<SessionTokenService>,
    pub signatures: Arc<ServiceSignatureValidator>,
}

/// Require a valid bearer token and a valid service signature
///
/// On success the caller is available to handlers as [`AuthenticatedUser`].
pub async fn authenticate(
    State(guard): State<AuthGuard>,
    mut req: Request,
    next: Next,
) -> UserResult<Response> {
    let token = bearer_token(req.headers())?.to_owned();

    let user = guard.tokens.verify(&token)?;

    guard.signatures.validate(req.headers())?;

    tracing::debug!(uuid = %user.uuid, "Request authenticated");

    req.extensions_mut().insert(AuthenticatedUser { user, token });

    Ok(next.run(req).await)
}

/// `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> UserResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(UserError::Unauthorized)?;

    let (scheme, token) = value.split_once(' ').ok_or(UserError::Unauthorized)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(UserError::Unauthorized);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    fn auth_header(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&auth_header("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(&auth_header("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn test_bearer_token_malformed() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
        assert!(bearer_token(&auth_header("Bearer")).is_err());
        assert!(bearer_token(&auth_header("Bearer   ")).is_err());
        assert!(bearer_token(&auth_header("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&auth_header("abc.def.ghi")).is_err());
    }

    #[test]
    fn test_handle_panic_is_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(String::from("boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
