use super::user::user_from_request;
use crate::auth::user::User;
use crate::errors::ApiError;
use actix_web::{dev, FromRequest, HttpRequest};
use futures::future::{ok, ready, Ready};
use uuid::Uuid;

#[derive(Clone)]
pub struct OptionalUser(pub Option<User>);

impl FromRequest for OptionalUser {
    type Error = ApiError;
    type Future = Ready<Result<OptionalUser, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut dev::Payload) -> Self::Future {
        // If auth header exists pass authorization errors back to client
        if req.headers().get("Authorization").is_some() {
            return ready(user_from_request(req).map(|user| OptionalUser(Some(user))));
        }
        ok(OptionalUser(None))
    }
}

impl OptionalUser {
    pub fn into_inner(self) -> Option<User> {
        self.0
    }
    pub fn id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|u| u.id())
    }
}
