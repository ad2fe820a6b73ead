use crate::errors::ApiError;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;
use uuid::Uuid;

pub const ACCESS_TOKEN_EXPIRY_MINUTES: u64 = 60;

// Scopes are not baked into the token. The extractor loads the user row
// anyway, so role changes take effect on the next request instead of at
// the next token refresh.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessToken {
    pub sub: String,
    pub iss: String,
    pub exp: u64,
}

impl AccessToken {
    pub fn new(user_id: &Uuid, issuer: String) -> Self {
        let mut timer = SystemTime::now();
        timer += Duration::from_secs(ACCESS_TOKEN_EXPIRY_MINUTES * 60);
        let exp = timer.duration_since(UNIX_EPOCH).unwrap().as_secs();

        AccessToken {
            iss: issuer,
            sub: user_id.hyphenated().to_string(),
            exp,
        }
    }

    pub fn get_id(&self) -> Result<Uuid, ApiError> {
        Ok(Uuid::parse_str(&self.sub)?)
    }
}
