pub use self::smtp_transport::SmtpTransport;
pub use self::test_transport::TestTransport;
pub use self::transport::Transport;

mod smtp_transport;
mod test_transport;
mod transport;
