/// JWT Token Generation and Validation
///
/// Signs and verifies access and refresh tokens (HS256) with the server-held secret.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;

use crate::auth::claims::{Claims, Identity, TokenType};
use crate::configuration::JwtSettings;
use crate::error::AppError;

/// Tokens returned by a successful login
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mints and verifies signed tokens
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    issuer: String,
}

impl JwtManager {
    pub fn new(config: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Verify issuer matches configuration
        validation.set_issuer(&[&config.issuer]);
        validation.leeway = config.leeway;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_token_expiry: config.access_token_expiry,
            refresh_token_expiry: config.refresh_token_expiry,
            issuer: config.issuer.clone(),
        }
    }

    /// Access token for `identity`. `fresh` is true only straight after a password check.
    pub fn issue_access_token(&self, identity: &Identity, fresh: bool) -> Result<String, AppError> {
        let claims = Claims::new(
            identity,
            TokenType::Access,
            fresh,
            self.access_token_expiry,
            self.issuer.clone(),
        );
        self.encode(&claims)
    }

    pub fn issue_refresh_token(&self, identity: &Identity) -> Result<String, AppError> {
        let claims = Claims::new(
            identity,
            TokenType::Refresh,
            false,
            self.refresh_token_expiry,
            self.issuer.clone(),
        );
        self.encode(&claims)
    }

    /// Fresh access token plus refresh token, as issued at login
    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(identity, true)?,
            refresh_token: self.issue_refresh_token(identity)?,
        })
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Verify signature, expiry, issuer and token type. Revocation is checked by
    /// [`TokenService`](crate::auth::TokenService), not here.
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => {
                    tracing::warn!("JWT validation error: {}", e);
                    AppError::MissingOrMalformedToken(e.to_string())
                }
            })?;

        if claims.token_type != expected {
            return Err(AppError::MissingOrMalformedToken(format!(
                "expected {} token, got {}",
                expected.as_str(),
                claims.token_type.as_str()
            )));
        }

        Ok(claims)
    }
}
