use crate::support;
use crate::support::database::TestDatabase;
use crate::support::test_request::TestRequest;
use actix_web::http::StatusCode;
use jwt::{decode, DecodingKey, Validation};
use marquee_api::auth::claims::{AccessToken, RefreshToken};
use marquee_api::auth::TokenResponse;
use marquee_api::controllers::auth::{self, LoginRequest, RefreshRequest};
use marquee_api::extractors::*;
use uuid::Uuid;

#[actix_rt::test]
async fn token() {
    let database = TestDatabase::new();
    let email = format!("kiran{}@example.com", Uuid::new_v4());
    let user = database
        .create_user()
        .with_email(email.clone())
        .with_password("strong_password".to_string())
        .finish();

    let test_request = TestRequest::create();
    let json = Json(LoginRequest {
        email,
        password: "strong_password".to_string(),
    });

    let response = support::unwrap_response(
        auth::token((test_request.request, database.connection.clone().into(), json)).await,
    );
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::unwrap_body_to_string(response).await;
    let token_response: TokenResponse = serde_json::from_str(&body).unwrap();

    let key = DecodingKey::from_secret(test_request.config.token_secret.as_bytes());
    let access = decode::<AccessToken>(&token_response.access_token, &key, &Validation::default()).unwrap();
    assert_eq!(access.claims.get_id().unwrap(), user.id);
    assert_eq!(access.claims.iss, test_request.config.token_issuer);

    // Refresh tokens carry no exp claim
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    let refresh = decode::<RefreshToken>(&token_response.refresh_token, &key, &validation).unwrap();
    assert_eq!(refresh.claims.get_id().unwrap(), user.id);
}

#[actix_rt::test]
async fn token_unknown_email() {
    let database = TestDatabase::new();
    database.create_user().finish();

    let test_request = TestRequest::create();
    let json = Json(LoginRequest {
        email: "nobody@example.com".to_string(),
        password: "strong_password".to_string(),
    });

    let response = support::unwrap_response(
        auth::token((test_request.request, database.connection.clone().into(), json)).await,
    );
    support::expects_unauthorized(response, "Email or password incorrect").await;
}

#[actix_rt::test]
async fn token_incorrect_password() {
    let database = TestDatabase::new();
    let user = database.create_user().finish();

    let test_request = TestRequest::create();
    let json = Json(LoginRequest {
        email: user.email,
        password: "not-the-password".to_string(),
    });

    let response = support::unwrap_response(
        auth::token((test_request.request, database.connection.clone().into(), json)).await,
    );
    support::expects_unauthorized(response, "Email or password incorrect").await;
}

#[actix_rt::test]
async fn token_guest_account_cannot_log_in() {
    let database = TestDatabase::new();
    let guest = database.create_user().guest().finish();

    let test_request = TestRequest::create();
    let json = Json(LoginRequest {
        email: guest.email,
        password: "anything".to_string(),
    });

    // Same message as a wrong password; the response does not reveal that
    // the account exists but has no credentials yet
    let response = support::unwrap_response(
        auth::token((test_request.request, database.connection.clone().into(), json)).await,
    );
    support::expects_unauthorized(response, "Email or password incorrect").await;
}

#[actix_rt::test]
async fn token_refresh() {
    let database = TestDatabase::new();
    let user = database.create_user().finish();

    let test_request = TestRequest::create();
    let issued = TokenResponse::create_from_user(
        &test_request.config.token_secret,
        &test_request.config.token_issuer,
        &user,
    )
    .unwrap();
    let refresh_token = issued.refresh_token.clone();
    let json = Json(RefreshRequest {
        refresh_token: issued.refresh_token,
    });

    let response = support::unwrap_response(
        auth::token_refresh((test_request.request, database.connection.clone().into(), json)).await,
    );
    assert_eq!(response.status(), StatusCode::OK);
    let body = support::unwrap_body_to_string(response).await;
    let token_response: TokenResponse = serde_json::from_str(&body).unwrap();

    // A fresh access token, the same refresh token handed back
    assert_eq!(token_response.refresh_token, refresh_token);
    let key = DecodingKey::from_secret(test_request.config.token_secret.as_bytes());
    let access = decode::<AccessToken>(&token_response.access_token, &key, &Validation::default()).unwrap();
    assert_eq!(access.claims.get_id().unwrap(), user.id);
}

#[actix_rt::test]
async fn token_refresh_invalid_token() {
    let database = TestDatabase::new();
    database.create_user().finish();

    let test_request = TestRequest::create();
    let json = Json(RefreshRequest {
        refresh_token: "not.a.token".to_string(),
    });

    let response = support::unwrap_response(
        auth::token_refresh((test_request.request, database.connection.clone().into(), json)).await,
    );
    support::expects_unauthorized(response, "Invalid token").await;
}
