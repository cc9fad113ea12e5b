/// Claim guard middleware
///
/// Runs a [`Requirement`] against the claims `JwtMiddleware` put on the request.
/// Must be mounted inside a `JwtMiddleware`.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{Claims, Requirement};
use crate::error::AppError;

pub struct ClaimGuard {
    requirement: Requirement,
}

impl ClaimGuard {
    /// Only callers whose `role` claim equals `role`
    pub fn role(role: impl Into<String>) -> Self {
        Self {
            requirement: Requirement::Role(role.into()),
        }
    }

    /// Only the caller whose `username` claim equals `username`
    pub fn author(username: impl Into<String>) -> Self {
        Self {
            requirement: Requirement::Author(username.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ClaimGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ClaimGuardService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(ClaimGuardService {
            service: Rc::new(service),
            requirement: Rc::new(self.requirement.clone()),
        }))
    }
}

pub struct ClaimGuardService<S> {
    service: Rc<S>,
    requirement: Rc<Requirement>,
}

impl<S, B> Service<ServiceRequest> for ClaimGuardService<S>
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
        let verdict = match req.extensions().get::<Claims>() {
            Some(claims) => self.requirement.check(claims),
            None => Err(AppError::MissingOrMalformedToken(
                "no verified token on request".to_string(),
            )),
        };

        let service = self.service.clone();
        Box::pin(async move {
            verdict?;
            service.call(req).await
        })
    }
}
