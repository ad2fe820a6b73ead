use crate::auth::user::User as AuthUser;
use crate::auth::TokenResponse;
use crate::db::Connection;
use crate::errors::*;
use crate::extractors::*;
use crate::models::RegisterRequest;
use crate::server::GetAppState;
use actix_web::{HttpRequest, HttpResponse};
use marquee_db::models::User;

pub async fn register(
    (http_request, connection, register_request): (HttpRequest, Connection, Json<RegisterRequest>),
) -> Result<HttpResponse, ApiError> {
    let state = http_request.state();
    let mut connection = connection.get();
    let connection = &mut *connection;

    let user = User::register(
        &register_request.first_name,
        &register_request.last_name,
        &register_request.email,
        register_request.phone.clone(),
        &register_request.password,
        connection,
    )?;

    let response = TokenResponse::create_from_user(&state.config.token_secret, &state.config.token_issuer, &user)?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn current_user(user: AuthUser) -> Result<HttpResponse, ApiError> {
    let scopes = user.global_scopes.clone();
    Ok(HttpResponse::Ok().json(json!({
        "user": user.user.for_display(),
        "scopes": scopes,
    })))
}
