/// Password Hashing and Verification
///
/// bcrypt hashing; verification is constant-time inside `bcrypt::verify`.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hash a password with bcrypt at `DEFAULT_COST`.
/// Used to provision user stores; the session endpoints only ever verify.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    if password.is_empty() {
        return Err(AppError::MissingRequiredField(
            "password: This field cannot be blank".to_string(),
        ));
    }

    hash(password, cost).map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash
///
/// # Errors
/// Returns error if the stored hash is not a valid bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}
