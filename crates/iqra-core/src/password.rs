//! Password hashing with bcrypt.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: u64 = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

/// Checks a password against an optional stored hash.
///
/// Identities created through OAuth carry no hash and never match.
pub fn check_password(password: &str, stored: Option<&str>) -> Result<bool, AppError> {
    match stored {
        Some(hash) if !hash.is_empty() => verify_password(password, hash),
        _ => Ok(false),
    }
}
