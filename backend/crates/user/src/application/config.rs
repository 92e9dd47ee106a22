//! Application Configuration
//!
//! Configuration for the user application layer.

use std::time::Duration;

use platform::password::PasswordHashParams;
use platform::rate_limit::RateLimitConfig;

/// User application configuration
#[derive(Clone)]
pub struct UserConfig {
    /// HS256 secret for session tokens
    pub jwt_secret: Vec<u8>,
    /// Session token lifetime
    pub token_ttl: Duration,
    /// Shared key for the service signature
    pub signature_key: String,
    /// Maximum clock skew accepted for `x-request-at`; `None` disables the check
    pub signature_tolerance: Option<Duration>,
    /// Per-client request budget
    pub rate_limit: RateLimitConfig,
    /// Argon2id cost
    pub password_hash: PasswordHashParams,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            token_ttl: Duration::from_secs(60 * 60), // 1 hour
            signature_key: String::new(),
            signature_tolerance: None,
            rate_limit: RateLimitConfig::default(),
            password_hash: PasswordHashParams::default(),
        }
    }
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("signature_key", &"[REDACTED]")
            .field("signature_tolerance", &self.signature_tolerance)
            .field("rate_limit", &self.rate_limit)
            .field("password_hash", &self.password_hash)
            .finish()
    }
}
