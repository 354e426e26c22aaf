use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Authenticates every request passing through the wrapped scope.
///
/// The bearer token is resolved into a [`User`] which is stored in the
/// request extensions for [`CurrentUser`](crate::auth::extractors::CurrentUser).
/// Failures short-circuit with a 401 response.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(app_err) => Ok(req.error_response(app_err).map_into_right_body()),
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AppError> {
    let token = bearer_token(req).ok_or_else(AppError::unauthorized)?;
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;

    state.sessions.resolve(&token).await
}

/// Returns the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;

    #[test]
    fn test_bearer_token_parsing() {
        let req = actix_test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_srv_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def.ghi"));

        let req = actix_test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "bearer abc.def.ghi"))
            .to_srv_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def.ghi"));

        for value in ["Basic dXNlcjpwdw==", "Bearer", "Bearer   ", "abc.def.ghi"] {
            let req = actix_test::TestRequest::default()
                .insert_header((header::AUTHORIZATION, value))
                .to_srv_request();
            assert_eq!(bearer_token(&req), None, "header {:?}", value);
        }

        let req = actix_test::TestRequest::default().to_srv_request();
        assert_eq!(bearer_token(&req), None);
    }
}
