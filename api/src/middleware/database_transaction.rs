use crate::db::Connection;
use crate::errors::ApiError;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{error, HttpMessage, HttpRequest};
use futures::future::{ok, LocalBoxFuture, Ready};

pub trait RequestConnection {
    fn connection(&self) -> Result<Connection, ApiError>;
}

impl RequestConnection for HttpRequest {
    fn connection(&self) -> Result<Connection, ApiError> {
        Connection::from_http_request(self)
    }
}

pub struct DatabaseTransaction;

impl DatabaseTransaction {
    pub fn new() -> DatabaseTransaction {
        DatabaseTransaction {}
    }
}

impl<S, B> Transform<S, ServiceRequest> for DatabaseTransaction
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = error::Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = error::Error;
    type InitError = ();
    type Transform = DatabaseTransactionService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(DatabaseTransactionService::new(service))
    }
}

pub struct DatabaseTransactionService<S> {
    service: S,
}

impl<S> DatabaseTransactionService<S> {
    fn new(service: S) -> Self {
        Self { service }
    }
}

impl<S, B> Service<ServiceRequest> for DatabaseTransactionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = error::Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    // The extractor opens the transaction; this reconciles it against the
    // response. An error attached to the response rolls back, anything
    // else commits.
    fn call(&self, request: ServiceRequest) -> Self::Future {
        let fut = self.service.call(request);
        Box::pin(async move {
            let response = fut.await?;

            let connection = response.request().extensions().get::<Connection>().cloned();
            if let Some(connection) = connection {
                let result = match response.response().error() {
                    Some(_) => connection.rollback_transaction(),
                    None => connection.commit_transaction(),
                };

                if let Err(e) = result {
                    error!("Could not complete transaction: {}", e.to_string());
                    let (request, _) = response.into_parts();
                    return Ok(ServiceResponse::from_err(e, request).map_into_right_body());
                }
            }

            Ok(response.map_into_left_body())
        })
    }
}
