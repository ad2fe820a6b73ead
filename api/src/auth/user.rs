use crate::errors::*;
use actix_web::HttpRequest;
use log::Level::Warn;
use marquee_db::models::{Scopes, User as DbUser};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct User {
    pub user: DbUser,
    pub global_scopes: Vec<String>,
    pub ip_address: Option<String>,
    pub uri: String,
    pub method: String,
}

impl User {
    pub fn new(user: DbUser, request: &HttpRequest) -> User {
        let global_scopes = user.get_global_scopes();
        User {
            user,
            global_scopes,
            ip_address: request
                .connection_info()
                .realip_remote_addr()
                .map(|i| i.to_string()),
            uri: request.uri().to_string(),
            method: request.method().to_string(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn email(&self) -> String {
        self.user.email.clone()
    }

    fn check_scope_access(&self, scope: Scopes, log_on_failure: bool) -> bool {
        if self.global_scopes.contains(&scope.to_string()) {
            return true;
        }

        if log_on_failure {
            let mut logging_data = HashMap::new();
            logging_data.insert("accessed_scope", json!(scope.to_string()));
            logging_data.insert("global_scopes", json!(self.global_scopes));
            self.log_unauthorized_access_attempt(logging_data);
        }
        false
    }

    pub fn has_scope(&self, scope: Scopes) -> bool {
        self.check_scope_access(scope, false)
    }

    pub fn log_unauthorized_access_attempt(&self, mut logging_data: HashMap<&'static str, Value>) {
        logging_data.insert("user_id", json!(self.id()));
        logging_data.insert("user_name", json!(self.user.full_name()));
        logging_data.insert("ip_address", json!(self.ip_address));
        logging_data.insert("url", json!(self.uri));
        logging_data.insert("method", json!(self.method));
        jlog!(Warn, "Unauthorized access attempt", logging_data);
    }

    pub fn requires_scope(&self, scope: Scopes) -> Result<(), ApiError> {
        if self.check_scope_access(scope, true) {
            return Ok(());
        }
        Err(AuthError::new(
            AuthErrorType::Forbidden,
            "User does not have the required permissions".to_string(),
        )
        .into())
    }
}
