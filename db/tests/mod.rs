#![deny(unreachable_patterns)]
#![deny(unknown_lints)]
#![deny(unused_variables)]
#![deny(unused_must_use)]
#[macro_use]
extern crate macros;
#[macro_use]
extern crate serde_json;
