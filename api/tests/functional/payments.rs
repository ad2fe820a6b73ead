use crate::support;
use crate::support::database::TestDatabase;
use crate::support::test_request::TestRequest;
use actix_web::http::StatusCode;
use marquee_api::controllers::payments::{self, VerifyPaymentRequest};
use marquee_api::extractors::*;
use marquee_db::models::*;
use serde_json::Value;

#[actix_rt::test]
async fn verify_activates_ticket() {
    let database = TestDatabase::new();
    let event = database.create_event().finish();
    let ticket = database.create_ticket().for_event(&event).finish();
    let payment = database.create_payment().for_ticket(&ticket).finish();
    let test_request = TestRequest::create();

    let signature = razorpay::sign_payload(
        format!("{}|{}", payment.external_order_id, "pay_test1").as_bytes(),
        &test_request.config.razorpay_key_secret,
    );
    let json = Json(VerifyPaymentRequest {
        razorpay_order_id: payment.external_order_id.clone(),
        razorpay_payment_id: "pay_test1".to_string(),
        razorpay_signature: signature,
    });
    let response = support::unwrap_response(
        payments::verify((test_request.request, database.connection.clone().into(), json)).await,
    );

    assert_eq!(response.status(), StatusCode::OK);
    let body = support::unwrap_body_to_string(response).await;
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], json!("completed"));
    let activated: Ticket = serde_json::from_value(value["ticket"].clone()).unwrap();
    assert_eq!(activated.status, TicketStatus::Active);
    assert_eq!(test_request.mail_transport.sent_messages().len(), 1);

    let connection = &mut *database.connection.borrow_mut();
    let found_payment = Payment::find(payment.id, connection).unwrap();
    assert_eq!(found_payment.status, PaymentStatus::Completed);
    assert_eq!(found_payment.external_payment_id, Some("pay_test1".to_string()));
    let found_event = Event::find(event.id, connection).unwrap();
    assert_eq!(found_event.sold_tickets, 1);
}

#[actix_rt::test]
async fn verify_activates_subscription() {
    let database = TestDatabase::new();
    let plan = database.create_subscription_plan().finish();
    let user = database.create_user().finish();
    let subscription = database
        .create_subscription()
        .for_user(&user)
        .with_plan(&plan)
        .finish();
    let payment = database.create_payment().for_subscription(&subscription).finish();
    let test_request = TestRequest::create();

    let signature = razorpay::sign_payload(
        format!("{}|{}", payment.external_order_id, "pay_test1").as_bytes(),
        &test_request.config.razorpay_key_secret,
    );
    let json = Json(VerifyPaymentRequest {
        razorpay_order_id: payment.external_order_id.clone(),
        razorpay_payment_id: "pay_test1".to_string(),
        razorpay_signature: signature,
    });
    let response = support::unwrap_response(
        payments::verify((test_request.request, database.connection.clone().into(), json)).await,
    );

    assert_eq!(response.status(), StatusCode::OK);
    let body = support::unwrap_body_to_string(response).await;
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], json!("completed"));
    assert_eq!(test_request.mail_transport.sent_messages().len(), 1);

    let connection = &mut *database.connection.borrow_mut();
    let activated = Subscription::find(subscription.id, connection).unwrap();
    assert_eq!(activated.status, SubscriptionStatus::Active);
    assert!(activated.start_date.is_some());
    assert!(activated.end_date.is_some());
}

#[actix_rt::test]
async fn verify_unknown_order() {
    let database = TestDatabase::new();
    let test_request = TestRequest::create();

    let json = Json(VerifyPaymentRequest {
        razorpay_order_id: "order_missing".to_string(),
        razorpay_payment_id: "pay_test1".to_string(),
        razorpay_signature: "whatever".to_string(),
    });
    let response = support::unwrap_response(
        payments::verify((test_request.request, database.connection.clone().into(), json)).await,
    );

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = support::unwrap_body_to_string(response).await;
    assert_eq!(body, json!({"error": "No results"}).to_string());
}

#[actix_rt::test]
async fn verify_with_invalid_signature() {
    let database = TestDatabase::new();
    let ticket = database.create_ticket().finish();
    let payment = database.create_payment().for_ticket(&ticket).finish();
    let test_request = TestRequest::create();

    let json = Json(VerifyPaymentRequest {
        razorpay_order_id: payment.external_order_id.clone(),
        razorpay_payment_id: "pay_test1".to_string(),
        razorpay_signature: "forged".to_string(),
    });
    let response = support::unwrap_response(
        payments::verify((test_request.request, database.connection.clone().into(), json)).await,
    );

    support::expects_unprocessable(response, "Payment signature is invalid").await;
    assert_eq!(test_request.mail_transport.sent_messages().len(), 0);

    let connection = &mut *database.connection.borrow_mut();
    let found_payment = Payment::find(payment.id, connection).unwrap();
    assert_eq!(found_payment.status, PaymentStatus::Created);
    let attempts = AuditLog::find(
        Tables::Payments,
        Some(payment.id),
        Some(AuditEvents::PaymentVerificationFailed),
        connection,
    )
    .unwrap();
    assert_eq!(attempts.len(), 1);
}

#[actix_rt::test]
async fn verify_twice_is_idempotent() {
    let database = TestDatabase::new();
    let event = database.create_event().finish();
    let ticket = database.create_ticket().for_event(&event).finish();
    let payment = database.create_payment().for_ticket(&ticket).finish();
    let test_request = TestRequest::create();

    let signature = razorpay::sign_payload(
        format!("{}|{}", payment.external_order_id, "pay_test1").as_bytes(),
        &test_request.config.razorpay_key_secret,
    );
    let json = Json(VerifyPaymentRequest {
        razorpay_order_id: payment.external_order_id.clone(),
        razorpay_payment_id: "pay_test1".to_string(),
        razorpay_signature: signature.clone(),
    });
    let response = support::unwrap_response(
        payments::verify((test_request.request, database.connection.clone().into(), json)).await,
    );
    assert_eq!(response.status(), StatusCode::OK);

    let second_request = TestRequest::create();
    let json = Json(VerifyPaymentRequest {
        razorpay_order_id: payment.external_order_id.clone(),
        razorpay_payment_id: "pay_test1".to_string(),
        razorpay_signature: signature,
    });
    let response = support::unwrap_response(
        payments::verify((second_request.request, database.connection.clone().into(), json)).await,
    );

    assert_eq!(response.status(), StatusCode::OK);
    let body = support::unwrap_body_to_string(response).await;
    assert_eq!(body, json!({"status": "completed"}).to_string());

    let connection = &mut *database.connection.borrow_mut();
    let found_event = Event::find(event.id, connection).unwrap();
    assert_eq!(found_event.sold_tickets, 1);
}

#[actix_rt::test]
async fn verify_after_capacity_exhausted() {
    let database = TestDatabase::new();
    let event = database.create_event().with_max_tickets(1).finish();
    let ticket = database.create_ticket().for_event(&event).finish();
    let payment = database.create_payment().for_ticket(&ticket).finish();
    database.create_ticket().for_event(&event).active().finish();
    let test_request = TestRequest::create();

    let signature = razorpay::sign_payload(
        format!("{}|{}", payment.external_order_id, "pay_test1").as_bytes(),
        &test_request.config.razorpay_key_secret,
    );
    let json = Json(VerifyPaymentRequest {
        razorpay_order_id: payment.external_order_id.clone(),
        razorpay_payment_id: "pay_test1".to_string(),
        razorpay_signature: signature,
    });
    let response = support::unwrap_response(
        payments::verify((test_request.request, database.connection.clone().into(), json)).await,
    );

    support::expects_unprocessable(response, "Event is sold out").await;
    assert_eq!(test_request.mail_transport.sent_messages().len(), 0);

    let connection = &mut *database.connection.borrow_mut();
    let found_payment = Payment::find(payment.id, connection).unwrap();
    assert_eq!(found_payment.status, PaymentStatus::Completed);
    let found_ticket = Ticket::find(ticket.id, connection).unwrap();
    assert_eq!(found_ticket.status, TicketStatus::Pending);
    let failures = AuditLog::find(
        Tables::Tickets,
        Some(ticket.id),
        Some(AuditEvents::TicketActivationFailed),
        connection,
    )
    .unwrap();
    assert_eq!(failures.len(), 1);
}
