use crate::auth::claims::RefreshToken;
use crate::auth::TokenResponse;
use crate::db::Connection;
use crate::errors::*;
use crate::extractors::*;
use crate::helpers::application;
use crate::jwt::{decode, DecodingKey, Validation};
use crate::server::GetAppState;
use actix_web::{HttpRequest, HttpResponse};
use marquee_db::models::User;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn token(
    (http_request, connection, login_request): (HttpRequest, Connection, Json<LoginRequest>),
) -> Result<HttpResponse, ApiError> {
    let state = http_request.state();
    let mut connection = connection.get();
    let connection = &mut *connection;

    // One message for a missing account and a wrong password. Guest accounts
    // have no password, so they fail the same way until claimed.
    let user = match User::find_by_email(&login_request.email, connection) {
        Ok(user) => user,
        Err(_) => {
            return application::unauthorized_with_message("Email or password incorrect", &http_request, None);
        }
    };

    if !user.check_password(&login_request.password) {
        return application::unauthorized_with_message("Email or password incorrect", &http_request, None);
    }

    let response = TokenResponse::create_from_user(&state.config.token_secret, &state.config.token_issuer, &user)?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn token_refresh(
    (http_request, connection, refresh_request): (HttpRequest, Connection, Json<RefreshRequest>),
) -> Result<HttpResponse, ApiError> {
    let state = http_request.state();
    let mut connection = connection.get();
    let connection = &mut *connection;

    // Refresh tokens carry no exp claim
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token = match decode::<RefreshToken>(
        &refresh_request.refresh_token,
        &DecodingKey::from_secret(state.config.token_secret.as_bytes()),
        &validation,
    ) {
        Ok(token) => token,
        Err(_) => {
            return application::unauthorized_with_message("Invalid token", &http_request, None);
        }
    };

    let user = User::find(token.claims.get_id()?, connection)?;

    let response = TokenResponse::create_from_refresh_token(
        &state.config.token_secret,
        &state.config.token_issuer,
        &user.id,
        &refresh_request.refresh_token,
    )?;
    Ok(HttpResponse::Ok().json(response))
}
