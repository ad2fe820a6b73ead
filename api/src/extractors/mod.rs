pub(crate) use self::access_token::*;
pub use self::json::*;
pub use self::optional_user::*;

mod access_token;
mod json;
mod optional_user;
mod user;
