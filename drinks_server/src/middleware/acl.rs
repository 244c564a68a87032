//! Access control middleware for the drinks server.
//! This middleware can be placed on any route or service.
//!
//! It reads the bearer token from the `Authorization` header, verifies it with the shared [`TokenVerifier`] and then
//! checks that the token grants the permission required by the route. If it does, the verified claims are stored in
//! the request extensions and the request continues. Otherwise the request is answered with a 401 (bad or missing
//! token) or 403 (valid token, missing permission) error envelope.

use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web,
    Error,
    HttpMessage,
};
use futures::future::{ok, Ready};
use log::*;

use crate::{
    auth::{check_permission, extract_bearer_token, JwtClaims, TokenVerifier},
    errors::ServerError,
};

pub struct AclMiddlewareFactory {
    required_permission: String,
}

impl AclMiddlewareFactory {
    pub fn new(required_permission: &str) -> Self {
        AclMiddlewareFactory { required_permission: required_permission.to_string() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { required_permission: self.required_permission.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_permission: String,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_permission = self.required_permission.clone();
        Box::pin(async move {
            match authorize(&req, &required_permission).await {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => {
                    debug!("🔐️ {} {} denied. {e}", req.method(), req.path());
                    Ok(req.error_response(e).map_into_right_body())
                },
            }
        })
    }
}

async fn authorize(req: &ServiceRequest, permission: &str) -> Result<JwtClaims, ServerError> {
    let verifier = req.app_data::<web::Data<TokenVerifier>>().cloned().ok_or_else(|| {
        warn!("🔐️ No token verifier has been registered with the application");
        ServerError::ConfigurationError("Token verification is not configured".into())
    })?;
    let token = extract_bearer_token(req.headers().get(AUTHORIZATION))?;
    let claims = verifier.verify(&token).await?;
    check_permission(&claims, permission)?;
    Ok(claims)
}
