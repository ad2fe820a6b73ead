use crate::controllers::payments::{activate_paid_purchase, ActivationOutcome};
use crate::db::Connection;
use crate::errors::*;
use crate::helpers::application;
use crate::server::GetAppState;
use actix_web::{web, HttpRequest, HttpResponse};
use log::Level::Warn;
use marquee_db::models::*;
use marquee_db::utils::errors::ErrorCode;
use razorpay::WebhookEvent;
use serde_json::Value;

const SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

/// Razorpay delivery endpoint. The signature covers the raw body, so the
/// handler takes the bytes and parses after the check.
pub async fn razorpay(
    (http_request, body, connection): (HttpRequest, web::Bytes, Connection),
) -> Result<HttpResponse, ApiError> {
    let state = http_request.state();

    let signature = match http_request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(signature) => signature.to_string(),
        None => {
            return application::unauthorized_with_message("Webhook signature is missing", &http_request, None);
        }
    };
    if !razorpay::verify_webhook_signature(&body, &signature, &state.config.razorpay_webhook_secret) {
        return application::unauthorized_with_message("Webhook signature is invalid", &http_request, None);
    }

    let raw_data: Value = serde_json::from_slice(&body)
        .map_err(|_| ApplicationError::bad_request("Webhook payload is not valid JSON"))?;
    let webhook: WebhookEvent = serde_json::from_value(raw_data.clone())
        .map_err(|_| ApplicationError::bad_request("Webhook payload is malformed"))?;

    match webhook.event.as_str() {
        "payment.captured" => payment_captured(state, &webhook, raw_data, connection),
        "payment.failed" => payment_failed(&webhook, raw_data, connection),
        _ => {
            jlog!(Warn, "api::webhooks", "Ignoring unhandled webhook event", {
                "event": webhook.event
            });
            Ok(acknowledged())
        }
    }
}

fn payment_captured(
    state: &crate::server::AppState,
    webhook: &WebhookEvent,
    raw_data: Value,
    connection: Connection,
) -> Result<HttpResponse, ApiError> {
    let entity = match webhook.payload.payment.as_ref() {
        Some(payment) => &payment.entity,
        None => return Ok(acknowledged()),
    };
    let order_id = match entity.order_id.as_ref() {
        Some(order_id) => order_id,
        None => {
            jlog!(Warn, "api::webhooks", "Captured payment without an order id", {
                "razorpay_payment_id": entity.id
            });
            return Ok(acknowledged());
        }
    };

    let mut connection = connection.get();
    let connection = &mut *connection;

    let payment = match find_payment(order_id, connection)? {
        Some(payment) => payment,
        None => return Ok(acknowledged()),
    };
    if payment.status == PaymentStatus::Completed {
        return Ok(acknowledged());
    }

    let payment = payment.mark_complete(entity.id.clone(), Some(raw_data), connection)?;
    match activate_paid_purchase(&state.config, &payment, connection)? {
        ActivationOutcome::Activated(_) => Ok(acknowledged()),
        // The failure is audited; acknowledge so the gateway stops retrying
        ActivationOutcome::Failed { .. } => Ok(acknowledged()),
    }
}

fn payment_failed(webhook: &WebhookEvent, raw_data: Value, connection: Connection) -> Result<HttpResponse, ApiError> {
    let entity = match webhook.payload.payment.as_ref() {
        Some(payment) => &payment.entity,
        None => return Ok(acknowledged()),
    };
    let order_id = match entity.order_id.as_ref() {
        Some(order_id) => order_id,
        None => return Ok(acknowledged()),
    };

    let mut connection = connection.get();
    let connection = &mut *connection;

    let payment = match find_payment(order_id, connection)? {
        Some(payment) => payment,
        None => return Ok(acknowledged()),
    };
    payment.mark_failed(Some(entity.id.clone()), Some(raw_data), connection)?;

    Ok(acknowledged())
}

/// Unknown orders are acknowledged rather than erroring; the gateway retries
/// on anything but a 2xx and the order will never appear.
fn find_payment(order_id: &str, conn: &mut diesel::PgConnection) -> Result<Option<Payment>, ApiError> {
    match Payment::find_by_external_order_id(order_id, conn) {
        Ok(payment) => Ok(Some(payment)),
        Err(ref e) if e.error_code == ErrorCode::NoResults => {
            jlog!(Warn, "api::webhooks", "Webhook for unknown order acknowledged", {
                "order_id": order_id
            });
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn acknowledged() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "acknowledged"}))
}
