#![deny(unreachable_patterns)]
#![deny(unknown_lints)]
#![deny(unused_variables)]
#![deny(unused_imports)]
// Unused results is more often than not an error
#![deny(unused_must_use)]
#![deny(unused_extern_crates)]
extern crate jsonwebtoken as jwt;
#[macro_use]
extern crate log;
#[macro_use]
extern crate logging;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;

pub mod auth;
pub mod config;
pub mod controllers;
pub mod db;
pub mod errors;
pub mod extractors;
pub mod helpers;
pub mod mail;
pub mod middleware;
pub mod models;
mod routing;
pub mod server;
