use crate::auth::user::User as AuthUser;
use crate::errors::*;
use actix_web::{http::StatusCode, HttpRequest, HttpResponse};
use log::Level::Warn;
use serde_json;
use std::collections::HashMap;

pub fn unauthorized(
    request: &HttpRequest,
    user: Option<AuthUser>,
) -> Result<HttpResponse, ApiError> {
    unauthorized_with_message("User does not have the required permissions", request, user)
}

pub fn unauthorized_with_message(
    message: &str,
    request: &HttpRequest,
    auth_user: Option<AuthUser>,
) -> Result<HttpResponse, ApiError> {
    if let Some(auth_user) = auth_user {
        auth_user.log_unauthorized_access_attempt(HashMap::new());
    } else {
        log_unauthorized_access_attempt_from_request(request);
    }

    let error: ApiError = AuthError::unauthorized(message).into();
    // Error required for triggering middleware rollback
    Ok(HttpResponse::from_error(error))
}

fn log_unauthorized_access_attempt_from_request(request: &HttpRequest) {
    let mut logging_data = HashMap::new();
    logging_data.insert(
        "ip_address",
        json!(request
            .connection_info()
            .realip_remote_addr()
            .map(|i| i.to_string())),
    );
    logging_data.insert("url", json!(request.uri().to_string()));
    logging_data.insert("method", json!(request.method().to_string()));
    jlog!(Warn, "Unauthorized access attempt", logging_data);
}

pub fn forbidden(message: &str) -> Result<HttpResponse, ApiError> {
    warn!("Forbidden: {}", message);
    let error: ApiError = AuthError::forbidden(message).into();
    // Error required for triggering middleware rollback
    Ok(HttpResponse::from_error(error))
}

pub fn unprocessable(message: &str) -> Result<HttpResponse, ApiError> {
    warn!("Unprocessable: {}", message);
    let error: ApiError = ApplicationError::unprocessable(message).into();
    // Error required for triggering middleware rollback
    Ok(HttpResponse::from_error(error))
}

pub fn internal_server_error(message: &str) -> Result<HttpResponse, ApiError> {
    error!("Internal Server Error: {}", message);
    let error: ApiError = ApplicationError::new(message.to_string()).into();
    // Error required for triggering middleware rollback
    Ok(HttpResponse::from_error(error))
}

pub fn not_found() -> Result<HttpResponse, ApiError> {
    warn!("Not found");
    let error: ApiError = NotFoundError {}.into();
    // Error required for triggering middleware rollback
    Ok(HttpResponse::from_error(error))
}

pub fn created(json: serde_json::Value) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::build(StatusCode::CREATED).json(json))
}
