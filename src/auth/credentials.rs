/// Credential verification against the user store

use crate::auth::password::verify_password;
use crate::error::AppError;
use crate::users::{User, UserStore};

/// Look up `username` and check `password` against its stored bcrypt hash.
///
/// # Errors
/// - `UserNotFound` when no such user exists
/// - `InvalidCredentials` when the password does not match
/// - `Internal` when the stored hash cannot be parsed
pub async fn authenticate(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = store
        .find_by_username(username)
        .await?
        .ok_or(AppError::UserNotFound)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}
