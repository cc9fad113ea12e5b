/// Session Routes
///
/// Login, logout and access-token refresh.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{authenticate, Claims, Identity, TokenService};
use crate::error::{AppError, ErrorContext};
use crate::users::UserStore;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [("username", &self.username), ("password", &self.password)] {
            if value.trim().is_empty() {
                return Err(AppError::MissingRequiredField(format!(
                    "{}: This field cannot be blank",
                    field
                )));
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /login
///
/// Verify username and password; on success return a fresh access token and a
/// refresh token.
///
/// # Errors
/// - 400: username or password missing or blank
/// - 401: wrong password
/// - 404: no such user
pub async fn login(
    form: web::Json<LoginRequest>,
    users: web::Data<dyn UserStore>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");
    form.validate()?;

    let user = authenticate(users.get_ref(), &form.username, &form.password).await?;
    let pair = tokens.issue_pair(&Identity::from(&user))?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %user.id,
        username = %user.username,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// POST /logout
///
/// Revoke the access token presented in the Authorization header. Only that
/// token is revoked; the refresh token from the same login stays valid.
/// **Requires a valid access token** (checked by `JwtMiddleware::access`).
pub async fn logout(
    claims: web::ReqData<Claims>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_logout").with_user_id(claims.sub.clone());

    tokens.revoke(&claims).await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = ?context.user_id,
        jti = %claims.jti,
        "User logged out"
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Successfully logged out".to_string(),
    }))
}

/// POST /token/refresh
///
/// Mint a new, non-fresh access token from the refresh token in the
/// Authorization header, without re-checking the password.
/// **Requires a valid refresh token** (checked by `JwtMiddleware::refresh`).
pub async fn refresh(
    claims: web::ReqData<Claims>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let access_token = tokens.refresh_access_token(&claims)?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %claims.sub,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok().json(RefreshResponse { access_token }))
}
