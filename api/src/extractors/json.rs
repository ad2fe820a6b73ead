// Wrapper around Actix Web's JSON extractor that reports deserialization
// problems as a JSON body instead of plain text.

use actix_web::error::{Error, InternalError, JsonPayloadError};
use actix_web::{dev::Payload, web, FromRequest, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for Json<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Error>>>>;

    #[inline]
    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);
        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(Json(json.into_inner())),
                Err(e) => Err(json_error(e)),
            }
        })
    }
}

fn json_error(err: Error) -> Error {
    let response = match err.as_error::<JsonPayloadError>() {
        Some(JsonPayloadError::Deserialize(json_error)) => {
            HttpResponse::BadRequest().json(json!({ "error": json_error.to_string() }))
        }
        _ => HttpResponse::BadRequest().finish(),
    };
    InternalError::from_response(err, response).into()
}
