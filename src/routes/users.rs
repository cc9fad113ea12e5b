/// User lookup routes, all behind `JwtMiddleware::access`

use actix_web::{web, HttpResponse};

use crate::auth::{author_required, Claims};
use crate::error::AppError;
use crate::users::{UserProfile, UserStore};

async fn profile_by_username(store: &dyn UserStore, username: &str) -> Result<HttpResponse, AppError> {
    let user = store
        .find_by_username(username)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// GET /me
///
/// Resolve the token's subject to the current user record.
///
/// # Errors
/// - 404: the user was removed after the token was issued
pub async fn current_user(
    claims: web::ReqData<Claims>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let user = users
        .find_by_id(claims.user_id()?)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// GET /users/{username}
///
/// A user's own profile; any other caller gets 403.
pub async fn user_profile(
    path: web::Path<String>,
    claims: web::ReqData<Claims>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();
    author_required(&claims, &username)?;

    profile_by_username(users.get_ref(), &username).await
}

/// GET /admin/users/{username}
///
/// Any user's profile. The admin role check is done by `ClaimGuard` on the scope.
pub async fn admin_user_lookup(
    path: web::Path<String>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    profile_by_username(users.get_ref(), &path.into_inner()).await
}
