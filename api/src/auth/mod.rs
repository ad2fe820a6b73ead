pub use self::token_response::TokenResponse;
pub use self::user::User;

pub mod claims;
mod token_response;
pub mod user;
