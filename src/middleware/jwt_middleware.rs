/// JWT Authentication Middleware
///
/// Validates the bearer token from the Authorization header (signature, expiry,
/// type, denylist) and injects its claims into request extensions for the
/// handlers behind it.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{TokenService, TokenType};
use crate::error::AppError;

/// Requires a valid token of one type on every request it wraps.
///
/// `JwtMiddleware::access` guards ordinary endpoints, `JwtMiddleware::refresh`
/// guards the refresh endpoint.
pub struct JwtMiddleware {
    tokens: TokenService,
    expected: TokenType,
}

impl JwtMiddleware {
    pub fn access(tokens: TokenService) -> Self {
        Self {
            tokens,
            expected: TokenType::Access,
        }
    }

    pub fn refresh(tokens: TokenService) -> Self {
        Self {
            tokens,
            expected: TokenType::Refresh,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
            expected: self.expected,
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    tokens: TokenService,
    expected: TokenType,
}

/// Token from an `Authorization: Bearer <token>` header value
pub fn extract_bearer_token(header: &str) -> Result<&str, AppError> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::MissingOrMalformedToken("expected `Bearer <token>`".to_string())
        })
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                AppError::MissingOrMalformedToken("missing Authorization header".to_string())
            })
            .and_then(|h| {
                h.to_str().map_err(|_| {
                    AppError::MissingOrMalformedToken("non-ASCII Authorization header".to_string())
                })
            })
            .and_then(|h| extract_bearer_token(h).map(str::to_string));

        let service = self.service.clone();
        let tokens = self.tokens.clone();
        let expected = self.expected;

        Box::pin(async move {
            let claims = tokens.verify(&token?, expected).await?;

            tracing::debug!(
                user_id = %claims.sub,
                jti = %claims.jti,
                token_type = expected.as_str(),
                "JWT validated successfully"
            );

            // Inject claims into request extensions
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
