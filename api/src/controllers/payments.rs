use crate::config::Config;
use crate::db::Connection;
use crate::errors::*;
use crate::extractors::*;
use crate::mail::mailers;
use crate::server::GetAppState;
use actix_web::{HttpRequest, HttpResponse};
use diesel::PgConnection;
use marquee_db::models::User as DbUser;
use marquee_db::models::*;
use marquee_db::utils::errors::ErrorCode;
use serde_json::Value;

pub(crate) const CURRENCY: &str = "inr";

/// The block checkout clients hand to the Razorpay widget.
pub(crate) fn checkout_block(payment: &Payment, key_id: &str) -> Value {
    json!({
        "payment_id": payment.id,
        "order_id": payment.external_order_id,
        "amount_in_cents": payment.amount_in_cents,
        "currency": payment.currency,
        "key_id": key_id,
    })
}

#[derive(Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

pub async fn verify(
    (http_request, connection, verify_request): (HttpRequest, Connection, Json<VerifyPaymentRequest>),
) -> Result<HttpResponse, ApiError> {
    let state = http_request.state();
    let mut connection = connection.get();
    let connection = &mut *connection;

    let payment = Payment::find_by_external_order_id(&verify_request.razorpay_order_id, connection)?;

    if !razorpay::verify_payment_signature(
        &verify_request.razorpay_order_id,
        &verify_request.razorpay_payment_id,
        &verify_request.razorpay_signature,
        &state.config.razorpay_key_secret,
    ) {
        AuditLog::create(
            AuditEvents::PaymentVerificationFailed,
            format!("Signature check failed for order {}", verify_request.razorpay_order_id),
            Tables::Payments,
            Some(payment.id),
            None,
            Some(json!({"razorpay_payment_id": verify_request.razorpay_payment_id})),
        )
        .commit(connection)?;
        // Plain response so the middleware commits the audit entry
        return Ok(HttpResponse::UnprocessableEntity().json(json!({"error": "Payment signature is invalid"})));
    }

    if payment.status == PaymentStatus::Completed {
        return Ok(HttpResponse::Ok().json(json!({"status": "completed"})));
    }

    let raw_data = json!({
        "razorpay_order_id": verify_request.razorpay_order_id,
        "razorpay_payment_id": verify_request.razorpay_payment_id,
        "razorpay_signature": verify_request.razorpay_signature,
    });
    let payment = payment.mark_complete(verify_request.razorpay_payment_id.clone(), Some(raw_data), connection)?;

    match activate_paid_purchase(&state.config, &payment, connection)? {
        ActivationOutcome::Activated(body) => Ok(HttpResponse::Ok().json(body)),
        // The payment stays Completed and the money is resolved out of band.
        // Plain response so the middleware commits what did happen.
        ActivationOutcome::Failed { reason } => Ok(HttpResponse::UnprocessableEntity().json(json!({"error": reason}))),
    }
}

pub(crate) enum ActivationOutcome {
    Activated(Value),
    Failed { reason: String },
}

/// Flips the paid-for record to Active once its payment is Completed. Shared
/// by the checkout callback and the gateway webhook so both settle a payment
/// identically.
pub(crate) fn activate_paid_purchase(
    config: &Config,
    payment: &Payment,
    conn: &mut PgConnection,
) -> Result<ActivationOutcome, ApiError> {
    if let Some(ticket) = payment.ticket(conn)? {
        let ticket = match ticket.activate(conn) {
            Ok(ticket) => ticket,
            Err(e) => {
                if e.error_code != ErrorCode::BusinessProcessError {
                    return Err(e.into());
                }
                // Capacity ran out (or the event closed) between order and
                // payment. Record it against the ticket and leave it Pending.
                let reason = e.cause.clone().unwrap_or_else(|| "Ticket could not be activated".to_string());
                AuditLog::create(
                    AuditEvents::TicketActivationFailed,
                    format!("Ticket activation failed: {}", reason),
                    Tables::Tickets,
                    Some(ticket.id),
                    Some(payment.user_id),
                    Some(json!({"payment_id": payment.id, "reason": reason})),
                )
                .commit(conn)?;
                return Ok(ActivationOutcome::Failed { reason });
            }
        };

        let event = Event::find(ticket.event_id, conn)?;
        let purchaser = DbUser::find(ticket.user_id, conn)?;
        let (email, recipient_name) = match (&ticket.guest_email, &ticket.guest_name) {
            (Some(email), Some(name)) => (email.clone(), name.clone()),
            _ => (purchaser.email.clone(), purchaser.full_name()),
        };
        mailers::deliver_or_log(mailers::tickets::confirmation_email(
            config,
            email,
            recipient_name,
            &ticket,
            &event,
        ));

        Ok(ActivationOutcome::Activated(json!({"status": "completed", "ticket": ticket})))
    } else if let Some(subscription) = payment.subscription(conn)? {
        let subscription = subscription.activate(conn)?;
        let plan = SubscriptionPlan::find(subscription.subscription_plan_id, conn)?;
        let member = DbUser::find(subscription.user_id, conn)?;
        mailers::deliver_or_log(mailers::subscriptions::activation_email(
            config,
            member.email.clone(),
            member.full_name(),
            &subscription,
            &plan,
        ));

        Ok(ActivationOutcome::Activated(
            json!({"status": "completed", "subscription": subscription}),
        ))
    } else {
        Err(ApplicationError::new("Payment has no purchase attached".to_string()).into())
    }
}
