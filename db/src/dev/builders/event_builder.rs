use crate::models::{Event, NewEvent};
use chrono::{Duration, NaiveDateTime, Utc};
use diesel::PgConnection;
use std::cell::RefCell;
use uuid::Uuid;

pub struct EventBuilder<'a> {
    name: String,
    venue: String,
    event_start: NaiveDateTime,
    door_time: Option<NaiveDateTime>,
    price_in_cents: i64,
    member_price_in_cents: Option<i64>,
    max_tickets: i64,
    published: bool,
    connection: &'a RefCell<PgConnection>,
}

impl<'a> EventBuilder<'a> {
    pub fn new(connection: &'a RefCell<PgConnection>) -> Self {
        let x = Uuid::new_v4();
        EventBuilder {
            name: format!("Warehouse Sessions {}", x),
            venue: "The Depot".into(),
            event_start: Utc::now().naive_utc() + Duration::days(30),
            door_time: None,
            price_in_cents: 50000,
            member_price_in_cents: None,
            max_tickets: 100,
            published: true,
            connection,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_venue(mut self, venue: &str) -> Self {
        self.venue = venue.to_string();
        self
    }

    pub fn with_event_start(mut self, event_start: NaiveDateTime) -> Self {
        self.event_start = event_start;
        self
    }

    pub fn in_the_past(mut self) -> Self {
        self.event_start = Utc::now().naive_utc() - Duration::days(2);
        self
    }

    pub fn with_door_time(mut self, door_time: NaiveDateTime) -> Self {
        self.door_time = Some(door_time);
        self
    }

    pub fn with_price(mut self, price_in_cents: i64) -> Self {
        self.price_in_cents = price_in_cents;
        self
    }

    pub fn with_member_price(mut self, member_price_in_cents: i64) -> Self {
        self.member_price_in_cents = Some(member_price_in_cents);
        self
    }

    pub fn with_max_tickets(mut self, max_tickets: i64) -> Self {
        self.max_tickets = max_tickets;
        self
    }

    pub fn draft(mut self) -> Self {
        self.published = false;
        self
    }

    pub fn finish(&self) -> Event {
        let mut connection = self.connection.borrow_mut();
        let connection = &mut *connection;
        let mut new_event: NewEvent = Event::create(
            &self.name,
            &self.venue,
            self.event_start,
            self.price_in_cents,
            self.max_tickets,
        );
        new_event.door_time = self.door_time;
        new_event.member_price_in_cents = self.member_price_in_cents;

        let event = new_event.commit(None, connection).unwrap();
        if self.published {
            event.publish(None, connection).unwrap()
        } else {
            event
        }
    }
}
