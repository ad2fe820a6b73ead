use crate::errors::{ApiError, ApplicationError};
use crate::mail::transports::Transport;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport as LettreSmtpTransport, Transport as _};

#[derive(Clone)]
pub struct SmtpTransport {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
}

impl SmtpTransport {
    pub fn new(
        host: &str,
        port: u16,
        user_name: Option<String>,
        password: Option<String>,
    ) -> Self {
        let credentials = match (user_name, password) {
            (Some(user_name), Some(password)) => Some(Credentials::new(user_name, password)),
            _ => None,
        };

        SmtpTransport {
            host: host.to_string(),
            port,
            credentials,
        }
    }

    fn build_smtp_transport(&self) -> LettreSmtpTransport {
        let mut builder = LettreSmtpTransport::builder_dangerous(&self.host).port(self.port);
        if let Some(credentials) = self.credentials.clone() {
            builder = builder.credentials(credentials);
        }
        builder.build()
    }
}

impl Transport for SmtpTransport {
    fn send(&self, message: Message) -> Result<(), ApiError> {
        self.build_smtp_transport()
            .send(&message)
            .map_err(|e| ApplicationError::new(format!("Mail failed to send: {}", e)))?;
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Transport + Send + Sync> {
        Box::new((*self).clone())
    }
}
