use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::core::AppError;
use crate::modules::users::models::AuthenticatedUser;
use crate::modules::users::services::AuthService;

/// Paths reachable without a session
const PUBLIC_PATHS: [&str; 4] = ["/", "/health", "/ready", "/auth/login"];

/// Raw bearer token of the current request, kept for logout
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Bearer-token session middleware.
///
/// Resolves `Authorization: Bearer <token>` to an [`AuthenticatedUser`] and
/// stores it in the request extensions.
pub struct SessionAuth {
    auth: AuthService,
}

impl SessionAuth {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            auth: self.auth.clone(),
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    auth: AuthService,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let auth = self.auth.clone();

        Box::pin(async move {
            if PUBLIC_PATHS.contains(&req.path()) {
                return svc.call(req).await.map(|res| res.map_into_left_body());
            }

            let resolved = match bearer_token(&req) {
                Some(token) => auth.authenticate(&token).await.map(|identity| (identity, token)),
                None => Err(AppError::unauthorized("Missing bearer token")),
            };

            let (identity, token) = match resolved {
                Ok(resolved) => resolved,
                Err(err) => {
                    tracing::debug!(path = %req.path(), error = %err, "Request not authenticated");
                    let response = err.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            tracing::debug!(
                user_id = %identity.user_id,
                role = %identity.role,
                path = %req.path(),
                "Session resolved"
            );

            req.extensions_mut().insert(identity);
            req.extensions_mut().insert(SessionToken(token));

            svc.call(req).await.map(|res| res.map_into_left_body())
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| Error::from(AppError::unauthorized("Not authenticated"))),
        )
    }
}

impl FromRequest for SessionToken {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<SessionToken>()
                .cloned()
                .ok_or_else(|| Error::from(AppError::unauthorized("Not authenticated"))),
        )
    }
}
