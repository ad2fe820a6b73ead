use super::AccessTokenExtractor;
use crate::auth::user::User;
use crate::errors::{ApiError, AuthError};
use crate::middleware::RequestConnection;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use marquee_db::models::User as DbUser;

pub(crate) fn user_from_request(req: &HttpRequest) -> Result<User, ApiError> {
    let token = AccessTokenExtractor::from_request(req)?;
    let connection = req.connection()?;

    let user_id = token
        .get_id()
        .map_err(|_| AuthError::unauthorized("Invalid Token"))?;

    let user = DbUser::find(user_id, &mut connection.get())
        .map_err(|_| AuthError::unauthorized("Invalid Token"))?;

    Ok(User::new(user, req))
}

impl FromRequest for User {
    type Error = ApiError;
    type Future = Ready<Result<User, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(user_from_request(req))
    }
}
