use crate::models::*;
use crate::schema::payments;
use crate::utils::errors::*;
use chrono::NaiveDateTime;
use diesel;
use diesel::dsl;
use diesel::prelude::*;
use log::Level::Debug;
use serde_json;
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, QueryableByName, Serialize)]
#[diesel(table_name = payments)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ticket_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub provider: PaymentProviders,
    pub external_order_id: String,
    pub external_payment_id: Option<String>,
    pub amount_in_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub raw_data: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub ticket_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub provider: PaymentProviders,
    pub external_order_id: String,
    pub amount_in_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
}

impl NewPayment {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<Payment, DatabaseError> {
        let result: Payment = diesel::insert_into(payments::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new payment")?;

        AuditLog::create(
            AuditEvents::PaymentCreated,
            format!(
                "Payment of {} {} created against order {}",
                self.amount_in_cents, self.currency, self.external_order_id
            ),
            Tables::Payments,
            Some(result.id),
            Some(self.user_id),
            Some(json!({
                "external_order_id": self.external_order_id,
                "amount_in_cents": self.amount_in_cents,
                "ticket_id": self.ticket_id,
                "subscription_id": self.subscription_id
            })),
        )
        .commit(conn)?;

        Ok(result)
    }
}

impl Payment {
    /// Exactly one of `ticket_id` / `subscription_id` must be set; a CHECK
    /// constraint holds the line.
    pub fn create(
        user_id: Uuid,
        ticket_id: Option<Uuid>,
        subscription_id: Option<Uuid>,
        provider: PaymentProviders,
        external_order_id: String,
        amount_in_cents: i64,
        currency: String,
    ) -> NewPayment {
        NewPayment {
            user_id,
            ticket_id,
            subscription_id,
            provider,
            external_order_id,
            amount_in_cents,
            currency,
            status: PaymentStatus::Created,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Payment, DatabaseError> {
        payments::table
            .find(id)
            .first::<Payment>(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading payment")
    }

    pub fn find_by_external_order_id(external_order_id: &str, conn: &mut PgConnection) -> Result<Payment, DatabaseError> {
        payments::table
            .filter(payments::external_order_id.eq(external_order_id))
            .first::<Payment>(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading payment for order")
    }

    /// Completion is idempotent: an already Completed payment is returned as
    /// is. A payment can complete from Created or from Failed, since the
    /// gateway allows fresh attempts against the same order.
    pub fn mark_complete(
        &self,
        external_payment_id: String,
        raw_data: Option<serde_json::Value>,
        conn: &mut PgConnection,
    ) -> Result<Payment, DatabaseError> {
        if self.status == PaymentStatus::Completed {
            return Payment::find(self.id, conn);
        }

        let rows_affected = diesel::update(
            payments::table
                .filter(payments::id.eq(self.id))
                .filter(payments::status.eq_any(vec![PaymentStatus::Created, PaymentStatus::Failed])),
        )
        .set((
            payments::status.eq(PaymentStatus::Completed),
            payments::external_payment_id.eq(Some(external_payment_id.clone())),
            payments::raw_data.eq(raw_data),
            payments::updated_at.eq(dsl::now),
        ))
        .execute(conn)
        .to_db_error(ErrorCode::UpdateError, "Could not complete payment")?;

        if rows_affected == 0 {
            let payment = Payment::find(self.id, conn)?;
            if payment.status == PaymentStatus::Completed {
                return Ok(payment);
            }
            return DatabaseError::concurrency_error("Could not complete payment because its status changed");
        }

        AuditLog::create(
            AuditEvents::PaymentCompleted,
            format!("Payment against order {} completed", self.external_order_id),
            Tables::Payments,
            Some(self.id),
            Some(self.user_id),
            Some(json!({"external_payment_id": external_payment_id})),
        )
        .commit(conn)?;

        Payment::find(self.id, conn)
    }

    /// Records a failed attempt. Only a Created payment moves; a Completed
    /// one is never downgraded by a late failure notification.
    pub fn mark_failed(
        &self,
        external_payment_id: Option<String>,
        raw_data: Option<serde_json::Value>,
        conn: &mut PgConnection,
    ) -> Result<Payment, DatabaseError> {
        let rows_affected = diesel::update(
            payments::table
                .filter(payments::id.eq(self.id))
                .filter(payments::status.eq(PaymentStatus::Created)),
        )
        .set((
            payments::status.eq(PaymentStatus::Failed),
            payments::external_payment_id.eq(external_payment_id.clone()),
            payments::raw_data.eq(raw_data),
            payments::updated_at.eq(dsl::now),
        ))
        .execute(conn)
        .to_db_error(ErrorCode::UpdateError, "Could not mark payment as failed")?;

        if rows_affected == 0 {
            jlog!(Debug, "Failure notification ignored for settled payment", {
                "payment_id": self.id,
                "status": self.status
            });
            return Payment::find(self.id, conn);
        }

        AuditLog::create(
            AuditEvents::PaymentFailed,
            format!("Payment against order {} failed", self.external_order_id),
            Tables::Payments,
            Some(self.id),
            Some(self.user_id),
            Some(json!({"external_payment_id": external_payment_id})),
        )
        .commit(conn)?;

        Payment::find(self.id, conn)
    }

    pub fn ticket(&self, conn: &mut PgConnection) -> Result<Option<Ticket>, DatabaseError> {
        match self.ticket_id {
            Some(id) => Ticket::find(id, conn).map(Some),
            None => Ok(None),
        }
    }

    pub fn subscription(&self, conn: &mut PgConnection) -> Result<Option<Subscription>, DatabaseError> {
        match self.subscription_id {
            Some(id) => Subscription::find(id, conn).map(Some),
            None => Ok(None),
        }
    }
}
