/// Token lifecycle: issue, verify against the denylist, revoke, refresh.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::claims::{Claims, Identity, TokenType};
use crate::auth::jwt::{JwtManager, TokenPair};
use crate::auth::revocation::RevocationStore;
use crate::configuration::JwtSettings;
use crate::error::AppError;

/// Shared by every worker; cloning is cheap.
#[derive(Clone)]
pub struct TokenService {
    jwt: JwtManager,
    revocations: Arc<dyn RevocationStore>,
    leeway: Duration,
}

impl TokenService {
    pub fn new(config: &JwtSettings, revocations: Arc<dyn RevocationStore>) -> Self {
        Self {
            jwt: JwtManager::new(config),
            revocations,
            leeway: Duration::from_secs(config.leeway),
        }
    }

    /// Fresh access token and refresh token for a user who just proved their password
    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, AppError> {
        self.jwt.issue_pair(identity)
    }

    /// New access token from a verified refresh token. Never fresh.
    pub fn refresh_access_token(&self, refresh_claims: &Claims) -> Result<String, AppError> {
        if refresh_claims.token_type != TokenType::Refresh {
            return Err(AppError::MissingOrMalformedToken(
                "refresh requires a refresh token".to_string(),
            ));
        }
        self.jwt
            .issue_access_token(&refresh_claims.identity()?, false)
    }

    /// A token is accepted iff its signature verifies, it is unexpired, it has
    /// the expected type and its jti is not on the denylist.
    ///
    /// A failing denylist lookup rejects the token.
    pub async fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.jwt.decode(token, expected)?;

        match self.revocations.contains(&claims.jti).await {
            Ok(false) => Ok(claims),
            Ok(true) => {
                tracing::warn!(
                    jti = %claims.jti,
                    user_id = %claims.sub,
                    "Attempt to use revoked token"
                );
                Err(AppError::RevokedToken)
            }
            Err(e) => {
                tracing::error!(
                    jti = %claims.jti,
                    error = %e,
                    "Revocation store lookup failed, rejecting token"
                );
                Err(AppError::RevokedToken)
            }
        }
    }

    /// Put the token's jti on the denylist until it would have expired.
    pub async fn revoke(&self, claims: &Claims) -> Result<(), AppError> {
        let ttl = claims.remaining_lifetime() + self.leeway;
        self.revocations.add(&claims.jti, ttl).await?;

        tracing::info!(
            jti = %claims.jti,
            user_id = %claims.sub,
            token_type = claims.token_type.as_str(),
            "Token revoked"
        );
        Ok(())
    }
}
