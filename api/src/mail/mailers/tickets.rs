use crate::config::Config;
use crate::mail::mailers::Mailer;
use marquee_db::models::{Event, Ticket};

pub fn confirmation_email(
    config: &Config,
    email: String,
    recipient_name: String,
    ticket: &Ticket,
    event: &Event,
) -> Mailer {
    let body = format!(
        "Hi {},\n\n\
         Your order for {} is confirmed: {} ticket(s) for {} at {}.\n\n\
         Show this code at the door:\n\n    {}\n\n\
         Manage your tickets any time at {}/tickets.\n\n\
         {}",
        recipient_name,
        event.name,
        ticket.quantity,
        event.event_start.format("%e %B %Y, %H:%M"),
        event.venue,
        ticket.redeem_key,
        config.front_end_url,
        config.app_name,
    );

    Mailer::new(
        config.clone(),
        (email, recipient_name),
        (
            config.mail_from_address.clone(),
            config.mail_from_name.clone(),
        ),
        format!("Your tickets for {}", event.name),
        body,
    )
}
