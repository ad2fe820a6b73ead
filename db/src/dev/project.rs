use crate::dev::builders::*;
use diesel::{Connection, PgConnection};
use dotenv::dotenv;
use std::cell::{RefCell, RefMut};
use std::env;

/// One test database connection inside a transaction that is never
/// committed. Model calls borrow the connection one statement at a time:
/// `&mut project.get_connection()`.
pub struct TestProject {
    connection: RefCell<PgConnection>,
}

impl TestProject {
    pub fn new() -> Self {
        dotenv().ok();
        let conn_str = env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be defined.");
        let mut connection = PgConnection::establish(&conn_str).expect("Could not get access to test database");
        connection
            .begin_test_transaction()
            .expect("Could not start testing transaction");
        TestProject {
            connection: RefCell::new(connection),
        }
    }

    pub fn get_connection(&self) -> RefMut<'_, PgConnection> {
        self.connection.borrow_mut()
    }

    pub fn create_user(&self) -> UserBuilder {
        UserBuilder::new(&self.connection)
    }

    pub fn create_event(&self) -> EventBuilder {
        EventBuilder::new(&self.connection)
    }

    pub fn create_subscription_plan(&self) -> SubscriptionPlanBuilder {
        SubscriptionPlanBuilder::new(&self.connection)
    }

    pub fn create_subscription(&self) -> SubscriptionBuilder {
        SubscriptionBuilder::new(&self.connection)
    }

    pub fn create_ticket(&self) -> TicketBuilder {
        TicketBuilder::new(&self.connection)
    }

    pub fn create_payment(&self) -> PaymentBuilder {
        PaymentBuilder::new(&self.connection)
    }
}
