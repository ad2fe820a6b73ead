pub use self::access_token::AccessToken;
pub use self::refresh_token::RefreshToken;

mod access_token;
mod refresh_token;
