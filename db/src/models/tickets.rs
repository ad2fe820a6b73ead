use crate::models::*;
use crate::schema::{tickets, users};
use crate::utils::dates;
use crate::utils::errors::*;
use chrono::prelude::*;
use diesel;
use diesel::dsl::{self, exists, select, sql};
use diesel::prelude::*;
use diesel::sql_types::Bool;
use rand::Rng;
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, QueryableByName, Serialize)]
#[diesel(table_name = tickets)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i64,
    pub total_price_in_cents: i64,
    pub status: TicketStatus,
    pub redeem_key: String,
    pub redeemed_at: Option<NaiveDateTime>,
    pub redeemed_by_user_id: Option<Uuid>,
    pub free_access_period: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = tickets)]
pub struct NewTicket {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i64,
    pub total_price_in_cents: i64,
    pub status: TicketStatus,
    pub redeem_key: String,
    pub free_access_period: Option<String>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum RedeemResults {
    TicketRedeemSuccess(Ticket),
    TicketAlreadyRedeemed,
    TicketInvalid,
}

/// Row on the door list: ticket joined with its purchaser's contact details.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DoorListItem {
    pub ticket_id: Uuid,
    pub quantity: i64,
    pub status: TicketStatus,
    pub purchaser_name: String,
    pub purchaser_email: String,
    pub redeemed_at: Option<NaiveDateTime>,
}

impl NewTicket {
    pub fn commit(&self, current_user_id: Option<Uuid>, conn: &mut PgConnection) -> Result<Ticket, DatabaseError> {
        let result: Ticket = diesel::insert_into(tickets::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new ticket")?;

        AuditLog::create(
            AuditEvents::TicketCreated,
            format!("Ticket for {} created", self.quantity),
            Tables::Tickets,
            Some(result.id),
            current_user_id,
            Some(json!({
                "event_id": self.event_id,
                "quantity": self.quantity,
                "total_price_in_cents": self.total_price_in_cents,
                "status": self.status
            })),
        )
        .commit(conn)?;

        Ok(result)
    }
}

impl Ticket {
    pub fn create(
        event_id: Uuid,
        user_id: Uuid,
        quantity: i64,
        total_price_in_cents: i64,
        guest_name: Option<String>,
        guest_email: Option<String>,
    ) -> NewTicket {
        NewTicket {
            event_id,
            user_id,
            quantity,
            total_price_in_cents,
            status: TicketStatus::Pending,
            redeem_key: generate_redeem_key(12),
            free_access_period: None,
            guest_name,
            guest_email,
        }
    }

    /// Grants a subscriber their monthly free ticket. Born Active, so the
    /// capacity is claimed here and the whole grant rides the request
    /// transaction.
    pub fn create_free_access(event: &Event, user: &User, conn: &mut PgConnection) -> Result<Ticket, DatabaseError> {
        let period = dates::month_key(Utc::now().naive_utc());
        if Ticket::free_access_used_in_month(user.id, &period, conn)? {
            return DatabaseError::business_process_error("Free access has already been used this month");
        }

        event.reserve_tickets(1, conn)?;

        let new_ticket = NewTicket {
            event_id: event.id,
            user_id: user.id,
            quantity: 1,
            total_price_in_cents: 0,
            status: TicketStatus::Active,
            redeem_key: generate_redeem_key(12),
            free_access_period: Some(period.clone()),
            guest_name: None,
            guest_email: None,
        };
        let ticket = new_ticket.commit(Some(user.id), conn)?;

        AuditLog::create(
            AuditEvents::FreeAccessGranted,
            format!("Free access ticket granted for '{}'", event.name),
            Tables::Tickets,
            Some(ticket.id),
            Some(user.id),
            Some(json!({"event_id": event.id, "free_access_period": period})),
        )
        .commit(conn)?;

        Ok(ticket)
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Ticket, DatabaseError> {
        tickets::table
            .find(id)
            .first::<Ticket>(conn)
            .to_db_error(ErrorCode::QueryError, "Unable to load ticket")
    }

    pub fn find_for_user(
        user_id: Uuid,
        page: u32,
        limit: u32,
        conn: &mut PgConnection,
    ) -> Result<(Vec<Ticket>, i64), DatabaseError> {
        let total: i64 = tickets::table
            .filter(tickets::user_id.eq(user_id))
            .count()
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Could not count tickets for user")?;

        let results = tickets::table
            .filter(tickets::user_id.eq(user_id))
            .order_by(tickets::created_at.desc())
            .limit(limit as i64)
            .offset(page as i64 * limit as i64)
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Could not load tickets for user")?;

        Ok((results, total))
    }

    /// Door list for an event. Valid (Active or Redeemed) tickets sort first.
    pub fn door_list(
        event_id: Uuid,
        page: u32,
        limit: u32,
        conn: &mut PgConnection,
    ) -> Result<(Vec<DoorListItem>, i64), DatabaseError> {
        let total: i64 = tickets::table
            .filter(tickets::event_id.eq(event_id))
            .count()
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Could not count tickets for event")?;

        let rows: Vec<(Ticket, String, String, String)> = tickets::table
            .inner_join(users::table)
            .filter(tickets::event_id.eq(event_id))
            .select((tickets::all_columns, users::first_name, users::last_name, users::email))
            .order_by(sql::<Bool>("tickets.status IN ('Active','Redeemed')").desc())
            .then_order_by(tickets::created_at.asc())
            .limit(limit as i64)
            .offset(page as i64 * limit as i64)
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Could not load door list")?;

        let results = rows
            .into_iter()
            .map(|(ticket, first_name, last_name, email)| {
                let purchaser_name = ticket
                    .guest_name
                    .clone()
                    .unwrap_or_else(|| format!("{} {}", first_name, last_name));
                let purchaser_email = ticket.guest_email.clone().unwrap_or(email);
                DoorListItem {
                    ticket_id: ticket.id,
                    quantity: ticket.quantity,
                    status: ticket.status,
                    purchaser_name,
                    purchaser_email,
                    redeemed_at: ticket.redeemed_at,
                }
            })
            .collect();

        Ok((results, total))
    }

    pub fn free_access_used_in_month(
        user_id: Uuid,
        period: &str,
        conn: &mut PgConnection,
    ) -> Result<bool, DatabaseError> {
        select(exists(
            tickets::table
                .filter(tickets::user_id.eq(user_id))
                .filter(tickets::free_access_period.eq(period))
                .filter(tickets::status.ne(TicketStatus::Cancelled)),
        ))
        .get_result(conn)
        .to_db_error(ErrorCode::QueryError, "Could not check free access usage")
    }

    /// Flips a Pending ticket to Active once its payment clears, claiming
    /// capacity first. Both writes share the caller's transaction, so a
    /// failure on either leaves nothing behind.
    pub fn activate(&self, conn: &mut PgConnection) -> Result<Ticket, DatabaseError> {
        if self.status == TicketStatus::Active {
            return Ticket::find(self.id, conn);
        }

        let event = Event::find(self.event_id, conn)?;
        event.reserve_tickets(self.quantity, conn)?;

        let rows_affected = diesel::update(
            tickets::table.filter(tickets::id.eq(self.id).and(tickets::status.eq(TicketStatus::Pending))),
        )
        .set((tickets::status.eq(TicketStatus::Active), tickets::updated_at.eq(dsl::now)))
        .execute(conn)
        .to_db_error(ErrorCode::UpdateError, "Could not activate ticket")?;
        if rows_affected == 0 {
            return DatabaseError::concurrency_error("Could not activate ticket because it is no longer pending");
        }

        AuditLog::create(
            AuditEvents::TicketActivated,
            format!("Ticket for '{}' activated", event.name),
            Tables::Tickets,
            Some(self.id),
            Some(self.user_id),
            Some(json!({"event_id": self.event_id, "quantity": self.quantity})),
        )
        .commit(conn)?;

        Ticket::find(self.id, conn)
    }

    pub fn redeem_ticket(
        ticket_id: Uuid,
        redeem_key: String,
        redeemer_user_id: Uuid,
        conn: &mut PgConnection,
    ) -> Result<RedeemResults, DatabaseError> {
        let ticket = Ticket::find(ticket_id, conn)?;

        if ticket.status == TicketStatus::Active && ticket.redeem_key == redeem_key {
            // Status guard covers two door scanners racing on the same key
            let rows_affected = diesel::update(
                tickets::table.filter(tickets::id.eq(ticket_id).and(tickets::status.eq(TicketStatus::Active))),
            )
            .set((
                tickets::status.eq(TicketStatus::Redeemed),
                tickets::redeemed_by_user_id.eq(redeemer_user_id),
                tickets::redeemed_at.eq(dsl::now.nullable()),
                tickets::updated_at.eq(dsl::now),
            ))
            .execute(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not set ticket to Redeemed")?;
            if rows_affected == 0 {
                return Ok(RedeemResults::TicketAlreadyRedeemed);
            }

            AuditLog::create(
                AuditEvents::TicketRedeemed,
                "Ticket redeemed".to_string(),
                Tables::Tickets,
                Some(ticket.id),
                Some(redeemer_user_id),
                None,
            )
            .commit(conn)?;
        } else if ticket.status == TicketStatus::Redeemed {
            return Ok(RedeemResults::TicketAlreadyRedeemed);
        } else {
            return Ok(RedeemResults::TicketInvalid);
        }

        Ok(RedeemResults::TicketRedeemSuccess(Ticket::find(ticket_id, conn)?))
    }

    /// Terminal state. Counted tickets give their capacity back on the way
    /// out.
    pub fn cancel(&self, current_user_id: Option<Uuid>, conn: &mut PgConnection) -> Result<Ticket, DatabaseError> {
        if self.status == TicketStatus::Cancelled {
            return DatabaseError::business_process_error("Ticket is already cancelled");
        }

        if self.status == TicketStatus::Active || self.status == TicketStatus::Redeemed {
            let event = Event::find(self.event_id, conn)?;
            event.release_tickets(self.quantity, conn)?;
        }

        let ticket: Ticket = diesel::update(self)
            .set((tickets::status.eq(TicketStatus::Cancelled), tickets::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not cancel ticket")?;

        AuditLog::create(
            AuditEvents::TicketCancelled,
            "Ticket cancelled".to_string(),
            Tables::Tickets,
            Some(self.id),
            current_user_id,
            Some(json!({"previous_status": self.status})),
        )
        .commit(conn)?;

        Ok(ticket)
    }
}

fn generate_redeem_key(len: u32) -> String {
    // No 0/1/O/L, the key gets read out loud at the door when scans fail
    let hash_char_list = vec![
        '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'M', 'N', 'P',
        'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    ];
    (0..len)
        .map(|_| hash_char_list[rand::thread_rng().gen_range(0..hash_char_list.len())])
        .collect()
}
