use crate::auth::claims::{AccessToken, RefreshToken};
use crate::jwt::errors::Error as JwtError;
use crate::jwt::{encode, EncodingKey, Header};
use actix_web::body::BoxBody;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use marquee_db::models::User;
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl Responder for TokenResponse {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::Ok().json(&self)
    }
}

impl TokenResponse {
    pub fn new(access_token: &str, refresh_token: &str) -> Self {
        TokenResponse {
            access_token: String::from(access_token),
            refresh_token: String::from(refresh_token),
        }
    }

    pub fn create_from_user(
        token_secret: &str,
        token_issuer: &str,
        user: &User,
    ) -> Result<Self, JwtError> {
        let access_token_claims = AccessToken::new(&user.id, token_issuer.to_string());
        let refresh_token_claims = RefreshToken::new(&user.id, token_issuer.to_string());
        let key = EncodingKey::from_secret(token_secret.as_bytes());

        Ok(TokenResponse {
            access_token: encode(&Header::default(), &access_token_claims, &key)?,
            refresh_token: encode(&Header::default(), &refresh_token_claims, &key)?,
        })
    }

    pub fn create_from_refresh_token(
        token_secret: &str,
        token_issuer: &str,
        user_id: &Uuid,
        signed_refresh_token: &str,
    ) -> Result<Self, JwtError> {
        let access_token_claims = AccessToken::new(user_id, token_issuer.to_string());
        let key = EncodingKey::from_secret(token_secret.as_bytes());

        Ok(TokenResponse {
            access_token: encode(&Header::default(), &access_token_claims, &key)?,
            refresh_token: String::from(signed_refresh_token),
        })
    }
}
