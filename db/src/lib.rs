#![deny(unreachable_patterns)]
#![deny(unknown_lints)]
#![deny(unused_variables)]
#![deny(unused_imports)]
// Unused results is more often than not an error
#![deny(unused_must_use)]
#![recursion_limit = "256"]

extern crate argon2rs;
extern crate backtrace;
extern crate chrono;
#[macro_use]
extern crate diesel;
extern crate dotenv;
extern crate log;
#[macro_use]
extern crate logging;
extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
extern crate uuid;
extern crate validator;

pub mod dev;
pub mod models;
pub mod schema;
pub mod utils;
pub mod validators;
