use crate::errors::*;
use crate::jwt::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use actix_web::http::header::ToStrError;
use actix_web::{http::StatusCode, HttpResponse};
use chrono;
use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;
use marquee_db::utils::errors::ErrorCode::ValidationError;
use marquee_db::utils::errors::*;
use razorpay::RazorpayError;
use serde_json::Error as SerdeError;
use std::error::Error;
use std::fmt::Debug;
use std::string::ToString;
use uuid::Error as UuidParseError;

pub trait ConvertToWebError: Debug + Error + ToString {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
    fn to_response(&self) -> HttpResponse;
}

fn internal_error(message: &str) -> HttpResponse {
    status_code_and_message(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn not_found() -> HttpResponse {
    status_code_and_message(StatusCode::NOT_FOUND, "Not found")
}

fn status_code_and_message(code: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(code).json(json!({"error": message.to_string()}))
}

impl ConvertToWebError for dyn Error {
    fn to_response(&self) -> HttpResponse {
        error!("General error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for DieselError {
    fn to_response(&self) -> HttpResponse {
        error!("Diesel error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for PoolError {
    fn to_response(&self) -> HttpResponse {
        error!("R2D2 error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for NotFoundError {
    fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }
    fn to_response(&self) -> HttpResponse {
        not_found()
    }
}

impl ConvertToWebError for JwtError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
    fn to_response(&self) -> HttpResponse {
        match self.kind() {
            JwtErrorKind::ExpiredSignature => info!("JWT error: {}", self),
            _ => warn!("JWT error: {}", self),
        }
        status_code_and_message(StatusCode::UNAUTHORIZED, "Invalid token")
    }
}

impl ConvertToWebError for UuidParseError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
    fn to_response(&self) -> HttpResponse {
        status_code_and_message(StatusCode::BAD_REQUEST, "Invalid input")
    }
}

impl ConvertToWebError for ToStrError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
    fn to_response(&self) -> HttpResponse {
        status_code_and_message(StatusCode::BAD_REQUEST, "Invalid input")
    }
}

impl ConvertToWebError for RazorpayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RazorpayError::GatewayError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn to_response(&self) -> HttpResponse {
        match self {
            RazorpayError::GatewayError(detail) => {
                warn!("Razorpay rejected request: {}", self);
                status_code_and_message(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    &format!("Unable to process payment, {}", detail.description),
                )
            }
            _ => {
                error!("Razorpay error: {}", self);
                internal_error("Internal error")
            }
        }
    }
}

impl ConvertToWebError for ApplicationError {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ApplicationErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApplicationErrorType::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationErrorType::BadRequest => StatusCode::BAD_REQUEST,
            ApplicationErrorType::ServerConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn to_response(&self) -> HttpResponse {
        warn!("Application error: {}", self);

        let message = match self.error_type {
            ApplicationErrorType::Internal => "Internal error",
            _ => &self.reason,
        };
        status_code_and_message(self.status_code(), message)
    }
}

impl ConvertToWebError for SerdeError {
    fn to_response(&self) -> HttpResponse {
        error!("Serde error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for chrono::ParseError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
    fn to_response(&self) -> HttpResponse {
        status_code_and_message(StatusCode::BAD_REQUEST, "Invalid input")
    }
}

impl ConvertToWebError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            AuthErrorType::Forbidden => StatusCode::FORBIDDEN,
            AuthErrorType::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
    fn to_response(&self) -> HttpResponse {
        warn!("AuthError error: {}", self.reason);

        status_code_and_message(self.status_code(), &self.reason)
    }
}

impl ConvertToWebError for DatabaseError {
    fn status_code(&self) -> StatusCode {
        match self.code {
            1000 | 1100 => StatusCode::BAD_REQUEST,
            2000 => StatusCode::NOT_FOUND,
            3400 => StatusCode::CONFLICT,
            7000 | 7200 => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn to_response(&self) -> HttpResponse {
        let message = match self.code {
            1000 => "Invalid input",
            1100 => "Missing input",
            2000 => "No results",
            3000 => "Query error",
            3100 => "Could not insert record",
            3200 => "Could not update record",
            3300 => "Could not delete record",
            3400 => self
                .cause
                .as_ref()
                .map(|s| s.as_str())
                .unwrap_or("Duplicate record exists"),
            4000 => "Connection error",
            7000 => self.cause.as_ref().map(|s| s.as_str()).unwrap_or("Unknown Cause"),
            7200 => match &self.error_code {
                ValidationError { errors } => {
                    return HttpResponse::UnprocessableEntity()
                        .json(json!({"error": "Validation error".to_string(), "fields": errors}))
                }
                _ => "Validation error",
            },
            5000 | 7300 => "Internal error",
            _ => "Unknown error",
        };
        status_code_and_message(self.status_code(), message)
    }
}
