pub use self::database_transaction::*;
pub use self::marquee_logger::*;

mod database_transaction;
mod marquee_logger;
