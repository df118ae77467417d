//! Password value object - Domain layer password handling.
//!
//! Encapsulates the strength policy and Argon2 hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::config::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("valid regex"));
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("valid regex"));
static DIGIT_OR_SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d\W]").expect("valid regex"));

/// Message returned when a password fails the strength policy.
pub const PASSWORD_POLICY_MESSAGE: &str =
    "The password must have a Uppercase, lowercase letter and a number";

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a validation error if the plain text breaks the strength policy.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        Self::check_policy(plain_text).map_err(|msg| AppError::validation(msg))?;

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    /// Length bounds, then character classes. A leading `.` or newline is rejected.
    pub fn check_policy(plain_text: &str) -> Result<(), &'static str> {
        let len = plain_text.chars().count() as u64;
        if len < MIN_PASSWORD_LENGTH {
            return Err("Password is too short");
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err("Password is too long");
        }
        if plain_text.starts_with('.') || plain_text.starts_with('\n') {
            return Err(PASSWORD_POLICY_MESSAGE);
        }
        if !(UPPERCASE.is_match(plain_text)
            && LOWERCASE.is_match(plain_text)
            && DIGIT_OR_SYMBOL.is_match(plain_text))
        {
            return Err(PASSWORD_POLICY_MESSAGE);
        }
        Ok(())
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

/// `validator` hook for request bodies carrying a new password.
pub fn validate_password_policy(plain_text: &str) -> Result<(), ValidationError> {
    Password::check_policy(plain_text).map_err(|msg| {
        let mut err = ValidationError::new("password_policy");
        err.message = Some(msg.into());
        err
    })
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}
