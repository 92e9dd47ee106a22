//! Service Signature Validation
//!
//! Calling services prove they hold the shared signature key by sending
//! `hex(sha256("{service_name}:{key}:{request_at}"))` in `x-api-key`.

use axum::http::HeaderMap;
use chrono::Utc;
use platform::crypto::{constant_time_eq, sha256_hex};
use std::time::Duration;

use crate::error::{UserError, UserResult};

pub const HEADER_API_KEY: &str = "x-api-key";
pub const HEADER_REQUEST_AT: &str = "x-request-at";
pub const HEADER_SERVICE_NAME: &str = "x-service-name";

/// Expected `x-api-key` for the given inputs
pub fn compute_signature(service_name: &str, key: &str, request_at: &str) -> String {
    let raw = format!("{}:{}:{}", service_name, key, request_at);
    sha256_hex(raw.as_bytes())
}

#[derive(Clone)]
pub struct ServiceSignatureValidator {
    key: String,
    tolerance: Option<Duration>,
}

impl ServiceSignatureValidator {
    pub fn new(key: impl Into<String>, tolerance: Option<Duration>) -> Self {
        Self {
            key: key.into(),
            tolerance,
        }
    }

    pub fn validate(&self, headers: &HeaderMap) -> UserResult<()> {
        self.validate_at(headers, Utc::now().timestamp())
    }

    /// Check the signature headers as of `now` (unix seconds)
    pub fn validate_at(&self, headers: &HeaderMap, now: i64) -> UserResult<()> {
        let api_key = header_str(headers, HEADER_API_KEY)?;
        let request_at = header_str(headers, HEADER_REQUEST_AT)?;
        let service_name = header_str(headers, HEADER_SERVICE_NAME)?;

        if let Some(tolerance) = self.tolerance {
            let sent_at: i64 = request_at.trim().parse().map_err(|_| {
                tracing::debug!("Request timestamp is not unix seconds");
                UserError::Unauthorized
            })?;

            if (now - sent_at).unsigned_abs() > tolerance.as_secs() {
                tracing::debug!(skew_secs = now - sent_at, "Request timestamp outside tolerance");
                return Err(UserError::Unauthorized);
            }
        }

        let expected = compute_signature(service_name, &self.key, request_at);

        if !constant_time_eq(expected.as_bytes(), api_key.as_bytes()) {
            tracing::debug!(service_name = %service_name, "Service signature mismatch");
            return Err(UserError::Unauthorized);
        }

        Ok(())
    }
}

impl std::fmt::Debug for ServiceSignatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceSignatureValidator")
            .field("key", &"[REDACTED]")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

/// The single, non-empty value of `name`; repeated headers are rejected
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> UserResult<&'a str> {
    let mut values = headers.get_all(name).iter();

    match (values.next(), values.next()) {
        (Some(value), None) => value
            .to_str()
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                tracing::debug!(header = name, "Unreadable service signature header");
                UserError::Unauthorized
            }),
        (None, _) => {
            tracing::debug!(header = name, "Missing service signature header");
            Err(UserError::Unauthorized)
        }
        (Some(_), Some(_)) => {
            tracing::debug!(header = name, "Repeated service signature header");
            Err(UserError::Unauthorized)
        }
    }
}
