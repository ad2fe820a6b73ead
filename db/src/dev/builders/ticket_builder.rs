use crate::dev::builders::{EventBuilder, UserBuilder};
use crate::models::{Event, Ticket, User};
use diesel::PgConnection;
use std::cell::RefCell;

pub struct TicketBuilder<'a> {
    event: Option<Event>,
    user: Option<User>,
    quantity: i64,
    total_price_in_cents: Option<i64>,
    guest_name: Option<String>,
    guest_email: Option<String>,
    active: bool,
    free_access: bool,
    connection: &'a RefCell<PgConnection>,
}

impl<'a> TicketBuilder<'a> {
    pub fn new(connection: &'a RefCell<PgConnection>) -> Self {
        TicketBuilder {
            event: None,
            user: None,
            quantity: 1,
            total_price_in_cents: None,
            guest_name: None,
            guest_email: None,
            active: false,
            free_access: false,
            connection,
        }
    }

    pub fn for_event(mut self, event: &Event) -> Self {
        self.event = Some(event.clone());
        self
    }

    pub fn for_user(mut self, user: &User) -> Self {
        self.user = Some(user.clone());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_total_price(mut self, total_price_in_cents: i64) -> Self {
        self.total_price_in_cents = Some(total_price_in_cents);
        self
    }

    pub fn as_guest(mut self, guest_name: &str, guest_email: &str) -> Self {
        self.guest_name = Some(guest_name.to_string());
        self.guest_email = Some(guest_email.to_string());
        self
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn free_access(mut self) -> Self {
        self.free_access = true;
        self
    }

    pub fn finish(&self) -> Ticket {
        let event = match &self.event {
            Some(event) => event.clone(),
            None => EventBuilder::new(self.connection).finish(),
        };
        let user = match &self.user {
            Some(user) => user.clone(),
            None => UserBuilder::new(self.connection).finish(),
        };

        let mut connection = self.connection.borrow_mut();
        let connection = &mut *connection;
        if self.free_access {
            return Ticket::create_free_access(&event, &user, connection).unwrap();
        }

        let total_price_in_cents = self
            .total_price_in_cents
            .unwrap_or(self.quantity * event.price_in_cents);
        let ticket = Ticket::create(
            event.id,
            user.id,
            self.quantity,
            total_price_in_cents,
            self.guest_name.clone(),
            self.guest_email.clone(),
        )
        .commit(Some(user.id), connection)
        .unwrap();

        if self.active {
            ticket.activate(connection).unwrap()
        } else {
            ticket
        }
    }
}
