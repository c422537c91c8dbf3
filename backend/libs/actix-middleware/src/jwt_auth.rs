use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, AUTHORIZATION},
    Error, HttpMessage, ResponseError,
};
use crypto_core::TokenService;
use error_types::{AuthError, ServiceError};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Authenticated user id bound to the request by `JwtAuthMiddleware`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

/// Resolve the `Authorization` header to a user id.
///
/// The header must be exactly `Bearer <token>`: two parts separated by a
/// single space, the first one literally `Bearer`.
pub fn authenticate(
    raw_header: Option<&HeaderValue>,
    tokens: &TokenService,
) -> Result<UserId, AuthError> {
    let raw = raw_header.ok_or(AuthError::MissingHeader)?;
    let header = raw.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let parts: Vec<&str> = header.split(' ').collect();
    let token = match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => *token,
        _ => return Err(AuthError::MalformedHeader),
    };

    tokens
        .validate(token)
        .map(UserId)
        .map_err(|_| AuthError::InvalidToken)
}

/// JWT Authentication Middleware
///
/// Rejects the request with a 401 JSON body before the wrapped service is
/// ever called; on success `UserId` is available to handlers.
#[derive(Clone)]
pub struct JwtAuthMiddleware {
    tokens: Arc<TokenService>,
}

impl JwtAuthMiddleware {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(req.headers().get(AUTHORIZATION), &self.tokens) {
            Ok(user_id) => {
                req.extensions_mut().insert(user_id);
                let service = self.service.clone();
                Box::pin(async move {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(auth_error) => {
                tracing::warn!(
                    path = %req.path(),
                    code = auth_error.code(),
                    "request rejected by auth"
                );
                let response = ServiceError::from(auth_error).error_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

/// FromRequest implementation for UserId
impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(ServiceError::from(AuthError::IdentityMissing).into())),
        }
    }
}
