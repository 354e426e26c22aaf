use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The authenticated principal of the current request.
///
/// Only available on routes wrapped by `AuthMiddleware`, which resolves the
/// bearer token and stores the [`User`] in the request extensions. Without
/// it the extractor fails with `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(CurrentUser(user))),
            None => ready(Err(AppError::unauthorized().into())),
        }
    }
}
