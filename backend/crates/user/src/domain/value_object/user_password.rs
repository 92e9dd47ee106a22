//! User Password Value Object
//!
//! Domain value object for user passwords.
//! Delegates to `platform::password` for cryptographic operations.
//!
//! ## Security Features
//! - Argon2id hashing (memory-hard)
//! - Automatic memory zeroization
//! - Constant-time comparison
//! - Unicode NFKC normalization

use platform::password::{
    ClearTextPassword, CredentialHasher, HashedPassword, PasswordPolicyError,
};
use std::fmt;

use crate::error::{FieldError, UserError, UserResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Wrapper around `ClearTextPassword` with domain-specific error handling.
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with validation
    ///
    /// Policy failures are reported as a validation error on `field`.
    pub fn new(raw: String, field: &str) -> UserResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| {
            let message = match e {
                PasswordPolicyError::TooLong { max, .. } => {
                    format!("{field} must be at most {max} characters")
                }
                PasswordPolicyError::EmptyOrWhitespace => format!("{field} is required"),
                PasswordPolicyError::InvalidCharacter => {
                    format!("{field} contains invalid characters")
                }
            };
            UserError::Validation(vec![FieldError::new(field, message)])
        })?;

        Ok(Self(clear_text))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password for database storage
///
/// Stores password in Argon2id PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password with the configured cost
    pub fn from_raw(raw: &RawPassword, hasher: &CredentialHasher) -> UserResult<Self> {
        let hashed = hasher
            .hash(raw.inner())
            .map_err(|e| UserError::Internal(e.to_string()))?;

        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> UserResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| UserError::Internal("Invalid password hash in database".to_string()))?;

        Ok(Self(hashed))
    }

    /// Get PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a raw password against this hash
    pub fn verify(&self, raw: &RawPassword, hasher: &CredentialHasher) -> bool {
        hasher.verify(&self.0, raw.inner())
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::PasswordHashParams;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(PasswordHashParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_raw_password_validation() {
        assert!(RawPassword::new("Secret1".to_string(), "password").is_ok());

        match RawPassword::new("   ".to_string(), "password") {
            Err(UserError::Validation(fields)) => {
                assert_eq!(fields, vec![FieldError::new("password", "password is required")]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let raw = RawPassword::new("Secret1".to_string(), "password").unwrap();
        let hashed = UserPassword::from_raw(&raw, &hasher).unwrap();

        assert!(hashed.verify(&raw, &hasher));

        let wrong = RawPassword::new("Secret2".to_string(), "password").unwrap();
        assert!(!hashed.verify(&wrong, &hasher));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hasher = hasher();
        let raw = RawPassword::new("Secret1".to_string(), "password").unwrap();
        let hashed = UserPassword::from_raw(&raw, &hasher).unwrap();

        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, &hasher));
    }

    #[test]
    fn test_corrupt_stored_hash() {
        assert!(matches!(
            UserPassword::from_phc_string("plaintext"),
            Err(UserError::Internal(_))
        ));
    }

    #[test]
    fn test_debug_redaction() {
        let hasher = hasher();
        let raw = RawPassword::new("Secret1".to_string(), "password").unwrap();
        assert!(!format!("{:?}", raw).contains("Secret1"));

        let hashed = UserPassword::from_raw(&raw, &hasher).unwrap();
        assert!(format!("{:?}", hashed).contains("[HASH]"));
    }
}
