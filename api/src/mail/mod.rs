pub mod mailers;
pub mod transports;
