use marquee_db::dev::TestProject;
use marquee_db::models::*;
use marquee_db::utils::errors::{get_error_message, ErrorCode};
use uuid::Uuid;

#[test]
fn commit() {
    let project = TestProject::new();
    let ticket = project.create_ticket().with_quantity(2).finish();

    let payment = Payment::create(
        ticket.user_id,
        Some(ticket.id),
        None,
        PaymentProviders::Razorpay,
        "order_MkZu4ts3D7Rx2P".to_string(),
        100000,
        "inr".to_string(),
    )
    .commit(&mut project.get_connection())
    .unwrap();

    assert_eq!(payment.user_id, ticket.user_id);
    assert_eq!(payment.ticket_id, Some(ticket.id));
    assert_eq!(payment.subscription_id, None);
    assert_eq!(payment.provider, PaymentProviders::Razorpay);
    assert_eq!(payment.external_order_id, "order_MkZu4ts3D7Rx2P");
    assert_eq!(payment.external_payment_id, None);
    assert_eq!(payment.amount_in_cents, 100000);
    assert_eq!(payment.currency, "inr");
    assert_eq!(payment.status, PaymentStatus::Created);

    let logs = AuditLog::find(
        Tables::Payments,
        Some(payment.id),
        Some(AuditEvents::PaymentCreated),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn commit_refuses_two_targets() {
    let project = TestProject::new();
    let ticket = project.create_ticket().finish();
    let subscription = project.create_subscription().finish();

    let result = Payment::create(
        ticket.user_id,
        Some(ticket.id),
        Some(subscription.id),
        PaymentProviders::Razorpay,
        "order_BothTargets1".to_string(),
        100000,
        "inr".to_string(),
    )
    .commit(&mut project.get_connection());
    assert!(result.is_err());
}

#[test]
fn commit_requires_a_target() {
    let project = TestProject::new();
    let user = project.create_user().finish();

    let result = Payment::create(
        user.id,
        None,
        None,
        PaymentProviders::Razorpay,
        "order_NoTarget1".to_string(),
        100000,
        "inr".to_string(),
    )
    .commit(&mut project.get_connection());
    assert!(result.is_err());
}

#[test]
fn commit_duplicate_external_order_id() {
    let project = TestProject::new();
    let ticket = project.create_ticket().finish();
    project
        .create_payment()
        .for_ticket(&ticket)
        .with_external_order_id("order_Dup1")
        .finish();

    let other_ticket = project.create_ticket().finish();
    let result = Payment::create(
        other_ticket.user_id,
        Some(other_ticket.id),
        None,
        PaymentProviders::Razorpay,
        "order_Dup1".to_string(),
        50000,
        "inr".to_string(),
    )
    .commit(&mut project.get_connection());

    assert_eq!(
        result.err().unwrap().code,
        get_error_message(&ErrorCode::DuplicateKeyError).0
    );
}

#[test]
fn find_by_external_order_id() {
    let project = TestProject::new();
    let payment = project.create_payment().with_external_order_id("order_Find1").finish();

    let found = Payment::find_by_external_order_id("order_Find1", &mut project.get_connection()).unwrap();
    assert_eq!(found.id, payment.id);

    let missing = Payment::find_by_external_order_id("order_Missing", &mut project.get_connection());
    assert_eq!(missing.err().unwrap().code, get_error_message(&ErrorCode::NoResults).0);
}

#[test]
fn mark_complete() {
    let project = TestProject::new();
    let payment = project.create_payment().finish();

    let completed = payment
        .mark_complete(
            "pay_29QQoUBi66xm2f".to_string(),
            Some(json!({"method": "upi"})),
            &mut project.get_connection(),
        )
        .unwrap();

    assert_eq!(completed.status, PaymentStatus::Completed);
    assert_eq!(completed.external_payment_id, Some("pay_29QQoUBi66xm2f".to_string()));
    assert_eq!(completed.raw_data, Some(json!({"method": "upi"})));

    let logs = AuditLog::find(
        Tables::Payments,
        Some(payment.id),
        Some(AuditEvents::PaymentCompleted),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);

    // completion is idempotent
    let again = completed
        .mark_complete("pay_29QQoUBi66xm2f".to_string(), None, &mut project.get_connection())
        .unwrap();
    assert_eq!(again.status, PaymentStatus::Completed);
    let logs = AuditLog::find(
        Tables::Payments,
        Some(payment.id),
        Some(AuditEvents::PaymentCompleted),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn mark_complete_after_failure() {
    let project = TestProject::new();
    let payment = project.create_payment().finish();

    let failed = payment
        .mark_failed(Some("pay_Failed1".to_string()), None, &mut project.get_connection())
        .unwrap();
    assert_eq!(failed.status, PaymentStatus::Failed);

    // the gateway allows another attempt against the same order
    let completed = failed
        .mark_complete("pay_Retry1".to_string(), None, &mut project.get_connection())
        .unwrap();
    assert_eq!(completed.status, PaymentStatus::Completed);
    assert_eq!(completed.external_payment_id, Some("pay_Retry1".to_string()));
}

#[test]
fn mark_failed() {
    let project = TestProject::new();
    let payment = project.create_payment().finish();

    let failed = payment
        .mark_failed(
            Some("pay_Failed2".to_string()),
            Some(json!({"error_code": "BAD_REQUEST_ERROR"})),
            &mut project.get_connection(),
        )
        .unwrap();

    assert_eq!(failed.status, PaymentStatus::Failed);
    assert_eq!(failed.external_payment_id, Some("pay_Failed2".to_string()));

    let logs = AuditLog::find(
        Tables::Payments,
        Some(payment.id),
        Some(AuditEvents::PaymentFailed),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn mark_failed_never_downgrades_completed() {
    let project = TestProject::new();
    let payment = project.create_payment().finish();
    let completed = payment
        .mark_complete("pay_Settled1".to_string(), None, &mut project.get_connection())
        .unwrap();

    let result = completed
        .mark_failed(Some("pay_Late1".to_string()), None, &mut project.get_connection())
        .unwrap();

    assert_eq!(result.status, PaymentStatus::Completed);
    assert_eq!(result.external_payment_id, Some("pay_Settled1".to_string()));

    let logs = AuditLog::find(
        Tables::Payments,
        Some(payment.id),
        Some(AuditEvents::PaymentFailed),
        &mut project.get_connection(),
    )
    .unwrap();
    assert!(logs.is_empty());
}

#[test]
fn ticket_and_subscription_accessors() {
    let project = TestProject::new();
    let ticket = project.create_ticket().finish();
    let payment = project.create_payment().for_ticket(&ticket).finish();

    let loaded = payment.ticket(&mut project.get_connection()).unwrap();
    assert_eq!(loaded.unwrap().id, ticket.id);
    assert!(payment.subscription(&mut project.get_connection()).unwrap().is_none());

    let subscription = project.create_subscription().finish();
    let payment = project.create_payment().for_subscription(&subscription).finish();

    let loaded = payment.subscription(&mut project.get_connection()).unwrap();
    assert_eq!(loaded.unwrap().id, subscription.id);
    assert!(payment.ticket(&mut project.get_connection()).unwrap().is_none());
}

#[test]
fn find() {
    let project = TestProject::new();
    let payment = project.create_payment().finish();

    let found = Payment::find(payment.id, &mut project.get_connection()).unwrap();
    assert_eq!(found.id, payment.id);

    assert!(Payment::find(Uuid::new_v4(), &mut project.get_connection()).is_err());
}
