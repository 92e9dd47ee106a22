//! Session Token Service
//!
//! Issues and verifies HS256-signed JWTs carrying the user's public profile.
//! The server keeps no session state: a token is valid exactly when its
//! signature checks out and its `exp` has not been reached.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::domain::entity::user::UserProfile;
use crate::error::{UserError, UserResult};

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user: UserProfile,
    /// Absolute expiry, unix seconds
    pub exp: i64,
}

/// Caller identity established by a verified bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: UserProfile,
    /// The raw bearer token, as presented
    pub token: String,
}

/// Freshly issued token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl SessionTokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` without leeway
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs: ttl.as_secs() as i64,
        }
    }

    pub fn issue(&self, profile: &UserProfile) -> UserResult<IssuedToken> {
        self.issue_at(profile, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (unix seconds)
    pub fn issue_at(&self, profile: &UserProfile, now: i64) -> UserResult<IssuedToken> {
        let claims = SessionClaims {
            user: profile.clone(),
            exp: now + self.ttl_secs,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| UserError::Internal(format!("Token signing failed: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    pub fn verify(&self, token: &str) -> UserResult<UserProfile> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify signature, algorithm and expiry as of `now`
    ///
    /// Any failure is reported as `Unauthorized`.
    pub fn verify_at(&self, token: &str, now: i64) -> UserResult<UserProfile> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;

        if now >= data.claims.exp {
            tracing::debug!(exp = data.claims.exp, "Session token expired");
            return Err(UserError::Unauthorized);
        }

        Ok(data.claims.user)
    }
}

impl fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}
