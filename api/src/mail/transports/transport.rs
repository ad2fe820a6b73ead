use crate::errors::ApiError;
use lettre::Message;

pub trait Transport {
    fn send(&self, message: Message) -> Result<(), ApiError>;
    fn box_clone(&self) -> Box<dyn Transport + Send + Sync>;
}

impl Clone for Box<dyn Transport + Send + Sync> {
    fn clone(&self) -> Box<dyn Transport + Send + Sync> {
        self.box_clone()
    }
}
