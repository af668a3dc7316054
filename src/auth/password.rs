use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// bcrypt only reads this many bytes of input; longer passwords are refused
/// rather than truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// One-way, salted bcrypt hash of `password` at the library's default cost.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::InternalServerError(format!(
            "Failed to hash password: longer than {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// A password longer than [`MAX_PASSWORD_BYTES`] never matches.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
