use crate::config::Config;
use crate::errors::{ApiError, ApplicationError};
use lettre::message::Mailbox;
use lettre::Message;

pub struct Mailer {
    config: Config,
    to: (String, String),
    from: (String, String),
    subject: String,
    body: String,
}

impl Mailer {
    pub fn new(
        config: Config,
        to: (String, String),
        from: (String, String),
        subject: String,
        body: String,
    ) -> Mailer {
        Mailer {
            config,
            to,
            from,
            subject,
            body,
        }
    }

    pub fn to(&self) -> (String, String) {
        self.to.clone()
    }

    pub fn from(&self) -> (String, String) {
        self.from.clone()
    }

    pub fn subject(&self) -> String {
        self.subject.clone()
    }

    pub fn body(&self) -> String {
        self.body.clone()
    }

    pub fn deliver(&mut self) -> Result<(), ApiError> {
        let email = Message::builder()
            .to(mailbox(self.to())?)
            .from(mailbox(self.from())?)
            .subject(self.subject())
            .body(self.body())
            .map_err(|e| ApplicationError::new(format!("Could not build mail: {}", e)))?;
        self.config.mail_transport.send(email)
    }
}

fn mailbox((address, name): (String, String)) -> Result<Mailbox, ApiError> {
    let address = address
        .parse()
        .map_err(|e| ApplicationError::new(format!("Invalid mail address: {}", e)))?;
    Ok(Mailbox::new(Some(name), address))
}
