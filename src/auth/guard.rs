/// Claim checks for protected operations
///
/// Called at the top of a handler, or through [`ClaimGuard`](crate::middleware::ClaimGuard)
/// before it. Both compare one extracted claim to the expected value with exact equality.

use std::future::Future;

use crate::auth::claims::Claims;
use crate::error::AppError;

/// Which claim a guard inspects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// `role` claim must equal the value
    Role(String),
    /// `username` claim must equal the value
    Author(String),
}

impl Requirement {
    pub fn check(&self, claims: &Claims) -> Result<(), AppError> {
        let (actual, expected) = match self {
            Requirement::Role(role) => (&claims.role, role),
            Requirement::Author(username) => (&claims.username, username),
        };

        if actual != expected {
            tracing::warn!(
                user_id = %claims.sub,
                requirement = ?self,
                "Caller lacks required claim"
            );
            return Err(AppError::InsufficientAuthorization);
        }
        Ok(())
    }
}

pub fn role_required(claims: &Claims, role: &str) -> Result<(), AppError> {
    Requirement::Role(role.to_string()).check(claims)
}

pub fn author_required(claims: &Claims, username: &str) -> Result<(), AppError> {
    Requirement::Author(username.to_string()).check(claims)
}

/// Run `operation` only if `requirement` holds; its result is passed through unchanged.
pub async fn guarded<F, Fut, T>(
    claims: &Claims,
    requirement: &Requirement,
    operation: F,
) -> Result<T, AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    requirement.check(claims)?;
    operation().await
}
