use crate::dev::builders::TicketBuilder;
use crate::models::{Payment, PaymentProviders, Subscription, Ticket};
use diesel::PgConnection;
use std::cell::RefCell;
use uuid::Uuid;

pub struct PaymentBuilder<'a> {
    ticket: Option<Ticket>,
    subscription: Option<Subscription>,
    amount_in_cents: Option<i64>,
    currency: String,
    external_order_id: String,
    connection: &'a RefCell<PgConnection>,
}

impl<'a> PaymentBuilder<'a> {
    pub fn new(connection: &'a RefCell<PgConnection>) -> Self {
        let x = Uuid::new_v4();
        PaymentBuilder {
            ticket: None,
            subscription: None,
            amount_in_cents: None,
            currency: "inr".into(),
            external_order_id: format!("order_{}", x.simple()),
            connection,
        }
    }

    pub fn for_ticket(mut self, ticket: &Ticket) -> Self {
        self.ticket = Some(ticket.clone());
        self
    }

    pub fn for_subscription(mut self, subscription: &Subscription) -> Self {
        self.subscription = Some(subscription.clone());
        self
    }

    pub fn with_amount(mut self, amount_in_cents: i64) -> Self {
        self.amount_in_cents = Some(amount_in_cents);
        self
    }

    pub fn with_external_order_id(mut self, external_order_id: &str) -> Self {
        self.external_order_id = external_order_id.to_string();
        self
    }

    pub fn finish(&self) -> Payment {
        let (user_id, ticket_id, subscription_id, default_amount) = match (&self.ticket, &self.subscription) {
            (Some(ticket), _) => (ticket.user_id, Some(ticket.id), None, ticket.total_price_in_cents),
            (None, Some(subscription)) => (subscription.user_id, None, Some(subscription.id), 99900),
            (None, None) => {
                // The payments table requires exactly one target
                let ticket = TicketBuilder::new(self.connection).finish();
                (ticket.user_id, Some(ticket.id), None, ticket.total_price_in_cents)
            }
        };

        let mut connection = self.connection.borrow_mut();
        let connection = &mut *connection;
        Payment::create(
            user_id,
            ticket_id,
            subscription_id,
            PaymentProviders::Razorpay,
            self.external_order_id.clone(),
            self.amount_in_cents.unwrap_or(default_amount),
            self.currency.clone(),
        )
        .commit(connection)
        .unwrap()
    }
}
