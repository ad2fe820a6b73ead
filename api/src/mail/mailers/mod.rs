pub use self::mailer::Mailer;

mod mailer;
pub mod subscriptions;
pub mod tickets;

/// Confirmation mail rides after the purchase it confirms; a delivery
/// problem is logged and the request still succeeds.
pub fn deliver_or_log(mut mailer: Mailer) {
    if let Err(e) = mailer.deliver() {
        error!("Mail delivery failed: {}", e);
    }
}
