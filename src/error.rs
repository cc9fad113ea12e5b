/// Error Handling Module
///
/// One error type for every request-path failure, mapped to an HTTP status and a
/// structured `{message, code}` body. Component-level failures (revocation store,
/// configuration) have their own narrow enums and convert into `AppError`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// ============================================================================
/// 1. COMPONENT ERROR TYPES
/// ============================================================================

/// Failures of the revocation store backend
#[derive(Debug, Error)]
pub enum RevocationError {
    #[error("revocation store unavailable: {0}")]
    Unavailable(String),
}

/// Startup configuration errors. These are fatal and never reach a request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required config: {0}")]
    MissingRequired(String),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
    #[error("Config parse error: {0}")]
    Parse(#[from] config::ConfigError),
}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type returned by handlers, middleware and the auth services
#[derive(Debug, Error)]
pub enum AppError {
    #[error("User does not exist.")]
    UserNotFound,

    #[error("Invalid Credentials!")]
    InvalidCredentials,

    /// Absent `Authorization` header, wrong scheme, bad signature, wrong token type
    #[error("Missing or malformed token: {0}")]
    MissingOrMalformedToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("caller does not meet the required authorization for this operation")]
    InsufficientAuthorization,

    #[error("{0}")]
    MissingRequiredField(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<RevocationError> for AppError {
    fn from(err: RevocationError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    /// Stable machine-readable code for client-side handling
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::MissingOrMalformedToken(_) => "TOKEN_INVALID",
            AppError::ExpiredToken => "TOKEN_EXPIRED",
            AppError::RevokedToken => "TOKEN_REVOKED",
            AppError::InsufficientAuthorization => "FORBIDDEN",
            AppError::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message exposed to the caller. Server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::MissingOrMalformedToken(_) => "Missing or malformed token".to_string(),
            AppError::Database(_) => "User store temporarily unavailable".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for correlating the response with server logs
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String) -> Self {
        Self {
            error_id,
            message,
            code,
        }
    }
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, request_id: &str);
}

impl ErrorHandler for AppError {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse) {
        let status = ResponseError::status_code(self);
        let body = ErrorResponse::new(
            request_id.to_string(),
            self.public_message(),
            self.code().to_string(),
        );
        (status, body)
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(
                    request_id = request_id,
                    error = %self,
                    "Request failed with server error"
                );
            }
            AppError::InvalidCredentials | AppError::UserNotFound => {
                tracing::warn!(
                    request_id = request_id,
                    error = %self,
                    "Failed login attempt"
                );
            }
            AppError::InsufficientAuthorization => {
                tracing::warn!(
                    request_id = request_id,
                    error = %self,
                    "Authorization denied"
                );
            }
            _ => {
                tracing::warn!(
                    request_id = request_id,
                    error = %self,
                    "Authentication error"
                );
            }
        }
    }
}

/// Implement ResponseError for Actix-web integration
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, body) = <Self as ErrorHandler>::error_response(self, &request_id);

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials
            | AppError::MissingOrMalformedToken(_)
            | AppError::ExpiredToken
            | AppError::RevokedToken => StatusCode::UNAUTHORIZED,
            AppError::InsufficientAuthorization => StatusCode::FORBIDDEN,
            AppError::MissingRequiredField(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ============================================================================
// 4. ERROR CONTEXT ENRICHMENT
// ============================================================================

/// Per-operation context carried through handlers for log correlation
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub user_id: Option<String>,
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            operation: operation.into(),
        }
    }

    pub fn with_user_id(mut self, user_id: String) -> Self {
        self.user_id = Some(user_id);
        self
    }
}
