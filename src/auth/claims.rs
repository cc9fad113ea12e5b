/// JWT Claims structure
///
/// Payload of both access and refresh tokens: standard JWT claims (RFC 7519)
/// plus the caller's identity, the token type and the freshness flag.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::users::User;

/// Distinguishes access tokens from refresh tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived, presented on every authenticated request
    Access,
    /// Long-lived, only accepted by the refresh endpoint
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Who a token was issued to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Unique token id, the key of the revocation store
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub iss: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// True only for access tokens minted directly from a password login
    pub fresh: bool,
}

impl Claims {
    /// Create claims for `identity` expiring `expiry_seconds` from now, with a new jti
    pub fn new(
        identity: &Identity,
        token_type: TokenType,
        fresh: bool,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: identity.user_id.to_string(),
            username: identity.username.clone(),
            role: identity.role.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now.saturating_add(expiry_seconds),
            iss: issuer,
            token_type,
            fresh,
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns error if the subject is not a valid UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| {
            AppError::MissingOrMalformedToken("subject is not a valid user id".to_string())
        })
    }

    /// Identity carried by this token
    pub fn identity(&self) -> Result<Identity, AppError> {
        Ok(Identity {
            user_id: self.user_id()?,
            username: self.username.clone(),
            role: self.role.clone(),
        })
    }

    /// Time until `exp`, zero once expired
    pub fn remaining_lifetime(&self) -> Duration {
        let remaining = self.exp - chrono::Utc::now().timestamp();
        Duration::from_secs(remaining.max(0) as u64)
    }
}
