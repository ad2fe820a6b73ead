use crate::models::{Roles, User};
use diesel::PgConnection;
use std::cell::RefCell;
use uuid::Uuid;

pub struct UserBuilder<'a> {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    password: String,
    guest: bool,
    roles: Vec<Roles>,
    connection: &'a RefCell<PgConnection>,
}

impl<'a> UserBuilder<'a> {
    pub fn new(connection: &'a RefCell<PgConnection>) -> Self {
        let x = Uuid::new_v4();
        UserBuilder {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: format!("asha{}@example.com", x),
            phone: Some("+919876543210".into()),
            password: "examplePassword".into(),
            guest: false,
            roles: vec![],
            connection,
        }
    }

    pub fn with_first_name(mut self, first_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self
    }

    pub fn with_last_name(mut self, last_name: &str) -> Self {
        self.last_name = last_name.to_string();
        self
    }

    pub fn with_email(mut self, email: String) -> Self {
        self.email = email;
        self
    }

    pub fn with_password(mut self, password: String) -> Self {
        self.password = password;
        self
    }

    pub fn with_phone(mut self, phone: String) -> Self {
        self.phone = Some(phone);
        self
    }

    pub fn guest(mut self) -> Self {
        self.guest = true;
        self
    }

    pub fn staff(mut self) -> Self {
        self.roles.push(Roles::Staff);
        self
    }

    pub fn admin(mut self) -> Self {
        self.roles.push(Roles::Admin);
        self
    }

    pub fn finish(&self) -> User {
        let mut connection = self.connection.borrow_mut();
        let connection = &mut *connection;
        let user = if self.guest {
            User::create_guest(&self.first_name, &self.last_name, &self.email, self.phone.clone())
                .commit(connection)
                .unwrap()
        } else {
            User::create(
                &self.first_name,
                &self.last_name,
                &self.email,
                self.phone.clone(),
                &self.password,
            )
            .commit(connection)
            .unwrap()
        };

        let mut user = user;
        for role in &self.roles {
            user = user.add_role(role.clone(), connection).unwrap();
        }
        user
    }
}
