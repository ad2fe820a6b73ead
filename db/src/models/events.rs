use crate::models::*;
use crate::schema::events;
use crate::utils::dates;
use crate::utils::errors::*;
use crate::validators::{self, append_validation_error, create_validation_error};
use chrono::prelude::*;
use diesel;
use diesel::dsl;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text, Uuid as dUuid};
use log::Level::Debug;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, QueryableByName, Serialize)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub venue: String,
    pub event_start: NaiveDateTime,
    pub door_time: Option<NaiveDateTime>,
    pub status: EventStatus,
    pub price_in_cents: i64,
    pub member_price_in_cents: Option<i64>,
    pub max_tickets: i64,
    pub sold_tickets: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Serialize, Deserialize, Validate, Clone)]
#[diesel(table_name = events)]
pub struct NewEvent {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters long"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Venue is required"))]
    pub venue: String,
    pub event_start: NaiveDateTime,
    pub door_time: Option<NaiveDateTime>,
    #[serde(default = "NewEvent::default_status", skip_deserializing)]
    pub status: EventStatus,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_in_cents: i64,
    #[validate(range(min = 0, message = "Member price must not be negative"))]
    pub member_price_in_cents: Option<i64>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub max_tickets: i64,
}

#[derive(AsChangeset, Clone, Default, Deserialize, Serialize, Validate)]
#[diesel(table_name = events)]
pub struct EventEditableAttributes {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters long"))]
    pub name: Option<String>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[validate(length(min = 1, message = "Venue is required"))]
    pub venue: Option<String>,
    pub event_start: Option<NaiveDateTime>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub door_time: Option<Option<NaiveDateTime>>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_in_cents: Option<i64>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub member_price_in_cents: Option<Option<i64>>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub max_tickets: Option<i64>,
}

/// Effective pricing of one event for one caller.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EventPricing {
    pub event_id: Uuid,
    pub base_price_in_cents: i64,
    pub member_price_in_cents: Option<i64>,
    pub price_in_cents: i64,
    pub has_active_subscription: bool,
    pub free_access_used_this_month: bool,
    pub free_access_available: bool,
}

/// One event whose counter disagrees with its live tickets, as reported by
/// `marquee-db verify-counts`.
#[derive(Debug, PartialEq, QueryableByName)]
pub struct SoldCountCheck {
    #[diesel(sql_type = dUuid)]
    pub event_id: Uuid,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = BigInt)]
    pub sold_tickets: i64,
    #[diesel(sql_type = BigInt)]
    pub counted: i64,
}

impl NewEvent {
    pub fn commit(&self, current_user_id: Option<Uuid>, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        let mut validation_errors = self.validate();
        validation_errors = append_validation_error(
            validation_errors,
            "member_price_in_cents",
            Event::member_price_valid(self.price_in_cents, self.member_price_in_cents),
        );
        if let Some(door_time) = self.door_time {
            validation_errors = append_validation_error(
                validation_errors,
                "door_time",
                validators::door_time_valid(door_time, self.event_start),
            );
        }
        validation_errors?;

        let result: Event = diesel::insert_into(events::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new event")?;

        AuditLog::create(
            AuditEvents::EventCreated,
            format!("Event '{}' created", &self.name),
            Tables::Events,
            Some(result.id),
            current_user_id,
            Some(json!({"venue": &self.venue, "event_start": self.event_start})),
        )
        .commit(conn)?;

        Ok(result)
    }

    pub fn default_status() -> EventStatus {
        EventStatus::Draft
    }
}

impl Event {
    pub fn create(
        name: &str,
        venue: &str,
        event_start: NaiveDateTime,
        price_in_cents: i64,
        max_tickets: i64,
    ) -> NewEvent {
        NewEvent {
            name: name.to_string(),
            description: None,
            venue: venue.to_string(),
            event_start,
            door_time: None,
            status: EventStatus::Draft,
            price_in_cents,
            member_price_in_cents: None,
            max_tickets,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        events::table
            .find(id)
            .first::<Event>(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading event")
    }

    /// Published events, upcoming by default, newest-starting last. `past`
    /// flips to events that have already started, most recent first.
    pub fn search(
        query: Option<&str>,
        past: bool,
        page: u32,
        limit: u32,
        conn: &mut PgConnection,
    ) -> Result<(Vec<Event>, i64), DatabaseError> {
        let now = Utc::now().naive_utc();
        let like_query = query.map(|q| format!("%{}%", q.trim()));

        let mut total_query = events::table
            .filter(events::status.eq(EventStatus::Published))
            .into_boxed();
        let mut query_builder = events::table
            .filter(events::status.eq(EventStatus::Published))
            .into_boxed();

        if past {
            total_query = total_query.filter(events::event_start.le(now));
            query_builder = query_builder
                .filter(events::event_start.le(now))
                .order_by(events::event_start.desc());
        } else {
            total_query = total_query.filter(events::event_start.gt(now));
            query_builder = query_builder
                .filter(events::event_start.gt(now))
                .order_by(events::event_start.asc());
        }

        if let Some(ref like_query) = like_query {
            total_query = total_query.filter(events::name.ilike(like_query.clone()));
            query_builder = query_builder.filter(events::name.ilike(like_query.clone()));
        }

        let total: i64 = total_query
            .count()
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Could not count events")?;

        let events = query_builder
            .limit(limit as i64)
            .offset(page as i64 * limit as i64)
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Could not load events")?;

        Ok((events, total))
    }

    pub fn update(
        &self,
        current_user_id: Option<Uuid>,
        attributes: EventEditableAttributes,
        conn: &mut PgConnection,
    ) -> Result<Event, DatabaseError> {
        if self.status == EventStatus::Cancelled || self.status == EventStatus::Closed {
            return DatabaseError::business_process_error("Event can no longer be updated");
        }
        self.validate_record(&attributes)?;

        let result: Event = DatabaseError::wrap(
            ErrorCode::UpdateError,
            "Could not update event",
            diesel::update(self)
                .set((&attributes, events::updated_at.eq(dsl::now)))
                .get_result(conn),
        )?;

        AuditLog::create(
            AuditEvents::EventUpdated,
            format!("Event '{}' was updated", &self.name),
            Tables::Events,
            Some(self.id),
            current_user_id,
            Some(json!(&attributes)),
        )
        .commit(conn)?;

        Ok(result)
    }

    pub fn publish(&self, current_user_id: Option<Uuid>, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        if self.status == EventStatus::Published {
            return Event::find(self.id, conn);
        }
        if self.status != EventStatus::Draft {
            return DatabaseError::business_process_error("Only draft events can be published");
        }

        diesel::update(self)
            .set((
                events::status.eq(EventStatus::Published),
                events::updated_at.eq(dsl::now),
            ))
            .execute(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not publish event")?;

        AuditLog::create(
            AuditEvents::EventPublished,
            format!("Event '{}' published", self.name),
            Tables::Events,
            Some(self.id),
            current_user_id,
            None,
        )
        .commit(conn)?;

        Event::find(self.id, conn)
    }

    /// Cancelled events stop selling immediately. Already-issued tickets are
    /// left untouched; refunds happen out of band.
    pub fn cancel(self, current_user_id: Option<Uuid>, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        if self.status == EventStatus::Cancelled || self.status == EventStatus::Closed {
            return DatabaseError::business_process_error("Event has already been cancelled or closed");
        }

        let event: Event = diesel::update(&self)
            .set((events::status.eq(EventStatus::Cancelled), events::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not cancel event")?;

        AuditLog::create(
            AuditEvents::EventCancelled,
            format!("Event '{}' cancelled", &self.name),
            Tables::Events,
            Some(self.id),
            current_user_id,
            None,
        )
        .commit(conn)?;

        Ok(event)
    }

    /// Sweeps Published events whose start has passed the cutoff to Closed.
    /// Run from the `marquee-db close-events` command.
    pub fn close_past(cutoff: NaiveDateTime, conn: &mut PgConnection) -> Result<Vec<Event>, DatabaseError> {
        let closed: Vec<Event> = diesel::update(
            events::table.filter(
                events::status
                    .eq(EventStatus::Published)
                    .and(events::event_start.lt(cutoff)),
            ),
        )
        .set((events::status.eq(EventStatus::Closed), events::updated_at.eq(dsl::now)))
        .get_results(conn)
        .to_db_error(ErrorCode::UpdateError, "Could not close past events")?;

        for event in &closed {
            AuditLog::create(
                AuditEvents::EventClosed,
                format!("Event '{}' closed", &event.name),
                Tables::Events,
                Some(event.id),
                None,
                Some(json!({"event_start": event.event_start})),
            )
            .commit(conn)?;
        }

        Ok(closed)
    }

    /// Compares each event's `sold_tickets` counter against the quantities on
    /// its Active and Redeemed tickets. An empty result means every counter
    /// agrees with the tickets table.
    pub fn find_sold_count_drift(conn: &mut PgConnection) -> Result<Vec<SoldCountCheck>, DatabaseError> {
        diesel::sql_query(
            r#"
            SELECT e.id AS event_id,
                   e.name,
                   e.sold_tickets,
                   COALESCE(SUM(t.quantity) FILTER (WHERE t.status IN ('Active', 'Redeemed')), 0)::BIGINT AS counted
            FROM events e
            LEFT JOIN tickets t ON t.event_id = e.id
            GROUP BY e.id
            HAVING e.sold_tickets <> COALESCE(SUM(t.quantity) FILTER (WHERE t.status IN ('Active', 'Redeemed')), 0)
            ORDER BY e.name
            "#,
        )
        .get_results(conn)
        .to_db_error(ErrorCode::QueryError, "Could not check sold ticket counts")
    }

    /// Resets drifted counters to their counted values, auditing each change.
    /// Run inside a transaction so the scan and the fixes see one snapshot.
    pub fn repair_sold_counts(conn: &mut PgConnection) -> Result<Vec<SoldCountCheck>, DatabaseError> {
        let drifted = Event::find_sold_count_drift(conn)?;
        for check in &drifted {
            diesel::update(events::table.filter(events::id.eq(check.event_id)))
                .set((events::sold_tickets.eq(check.counted), events::updated_at.eq(dsl::now)))
                .execute(conn)
                .to_db_error(ErrorCode::UpdateError, "Could not repair sold ticket count")?;

            AuditLog::create(
                AuditEvents::CountsRepaired,
                format!("Sold ticket count for event '{}' repaired", &check.name),
                Tables::Events,
                Some(check.event_id),
                None,
                Some(json!({"old": check.sold_tickets, "new": check.counted})),
            )
            .commit(conn)?;
        }

        Ok(drifted)
    }

    pub fn is_purchasable(&self, now: NaiveDateTime) -> bool {
        self.status == EventStatus::Published && self.event_start > now
    }

    pub fn remaining_tickets(&self) -> i64 {
        self.max_tickets - self.sold_tickets
    }

    /// Claims `quantity` of the event's capacity. The filter doubles as the
    /// capacity guard: zero rows affected means another purchase took the
    /// remaining capacity, or the event left the Published state.
    pub fn reserve_tickets(&self, quantity: i64, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        let rows_affected = diesel::update(
            events::table.filter(
                events::id
                    .eq(self.id)
                    .and(events::status.eq(EventStatus::Published))
                    .and((events::sold_tickets + quantity).le(events::max_tickets)),
            ),
        )
        .set((
            events::sold_tickets.eq(events::sold_tickets + quantity),
            events::updated_at.eq(dsl::now),
        ))
        .execute(conn)
        .to_db_error(ErrorCode::UpdateError, "Could not reserve tickets for event")?;

        if rows_affected == 0 {
            let event = Event::find(self.id, conn)?;
            jlog!(Debug, "Ticket reservation rejected", {
                "event_id": self.id,
                "quantity": quantity,
                "sold_tickets": event.sold_tickets,
                "max_tickets": event.max_tickets,
                "status": event.status
            });
            if event.status != EventStatus::Published {
                return DatabaseError::business_process_error("Event is not open for sale");
            }
            return DatabaseError::business_process_error("Event is sold out");
        }

        Event::find(self.id, conn)
    }

    /// Returns capacity claimed by a ticket that is being cancelled.
    pub fn release_tickets(&self, quantity: i64, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        let rows_affected = diesel::update(
            events::table.filter(
                events::id
                    .eq(self.id)
                    .and((events::sold_tickets - quantity).ge(0)),
            ),
        )
        .set((
            events::sold_tickets.eq(events::sold_tickets - quantity),
            events::updated_at.eq(dsl::now),
        ))
        .execute(conn)
        .to_db_error(ErrorCode::UpdateError, "Could not release tickets for event")?;

        if rows_affected == 0 {
            return DatabaseError::concurrency_error("Could not release tickets because the counter would go negative");
        }

        Event::find(self.id, conn)
    }

    /// Pricing and free-access entitlement as seen by one caller. Anonymous
    /// callers get base pricing with both flags false.
    pub fn pricing_for_user(&self, user: Option<&User>, conn: &mut PgConnection) -> Result<EventPricing, DatabaseError> {
        let now = Utc::now().naive_utc();
        let (has_active_subscription, free_access_used_this_month) = match user {
            Some(user) => {
                let subscription = Subscription::active_for_user(user.id, conn)?;
                let used = Ticket::free_access_used_in_month(user.id, &dates::month_key(now), conn)?;
                (subscription.is_some(), used)
            }
            None => (false, false),
        };

        let price_in_cents = match self.member_price_in_cents {
            Some(member_price) if has_active_subscription && member_price < self.price_in_cents => member_price,
            _ => self.price_in_cents,
        };

        Ok(EventPricing {
            event_id: self.id,
            base_price_in_cents: self.price_in_cents,
            member_price_in_cents: self.member_price_in_cents,
            price_in_cents,
            has_active_subscription,
            free_access_used_this_month,
            free_access_available: has_active_subscription
                && !free_access_used_this_month
                && self.is_purchasable(now),
        })
    }

    fn validate_record(&self, attributes: &EventEditableAttributes) -> Result<(), DatabaseError> {
        let mut validation_errors = attributes.validate();

        let price_in_cents = attributes.price_in_cents.unwrap_or(self.price_in_cents);
        let member_price_in_cents = match attributes.member_price_in_cents {
            Some(value) => value,
            None => self.member_price_in_cents,
        };
        validation_errors = append_validation_error(
            validation_errors,
            "member_price_in_cents",
            Event::member_price_valid(price_in_cents, member_price_in_cents),
        );

        let event_start = attributes.event_start.unwrap_or(self.event_start);
        let door_time = match attributes.door_time {
            Some(value) => value,
            None => self.door_time,
        };
        if let Some(door_time) = door_time {
            validation_errors = append_validation_error(
                validation_errors,
                "door_time",
                validators::door_time_valid(door_time, event_start),
            );
        }

        Ok(validation_errors?)
    }

    fn member_price_valid(price_in_cents: i64, member_price_in_cents: Option<i64>) -> Result<(), ValidationError> {
        if let Some(member_price) = member_price_in_cents {
            if member_price >= price_in_cents {
                let mut validation_error = create_validation_error(
                    "member_price_must_be_below_base_price",
                    "Member price must be less than the base price",
                );
                validation_error.add_param(Cow::from("price_in_cents"), &price_in_cents);
                validation_error.add_param(Cow::from("member_price_in_cents"), &member_price);
                return Err(validation_error);
            }
        }
        Ok(())
    }
}
