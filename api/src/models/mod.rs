pub use self::path_parameters::*;
pub use self::register_request::*;

mod path_parameters;
mod register_request;
