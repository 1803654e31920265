use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::session_service::SessionStore;

/// Identity resolved by the session gate, injected into request extensions
/// for handlers to pick up via `web::ReqData<AuthenticatedUser>`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Session gate: every route wrapped by this middleware requires a live
/// session token. Anonymous requests are turned away to the login entry
/// point without side effects.
pub struct SessionGate;

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateService { service }))
    }
}

pub struct SessionGateService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = bearer_token(&req);

        let username = token.and_then(|token| {
            req.app_data::<web::Data<SessionStore>>()
                .and_then(|sessions| sessions.validate(&token))
        });

        match username {
            Some(username) => {
                req.extensions_mut().insert(AuthenticatedUser { username });

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res)
                })
            }
            None => Box::pin(async move {
                Err(actix_web::error::ErrorUnauthorized(
                    "Login required - POST /api/v1/auth/login",
                ))
            }),
        }
    }
}

/// Pulls the opaque session token out of `Authorization: Bearer <token>`
pub fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?;
    let header_str = header.to_str().ok()?;

    header_str
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}
