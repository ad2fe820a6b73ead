use crate::errors::ApiError;
use crate::mail::transports::Transport;
use lettre::Message;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct TestTransport {
    pub sent: Arc<Mutex<Vec<Message>>>,
}

impl TestTransport {
    pub fn new() -> Self {
        TestTransport {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sent_messages(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for TestTransport {
    fn send(&self, message: Message) -> Result<(), ApiError> {
        {
            let mut sent = self.sent.lock().unwrap();
            sent.push(message);
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Transport + Send + Sync> {
        Box::new((*self).clone())
    }
}
