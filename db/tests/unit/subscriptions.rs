use chrono::prelude::*;
use chrono::Duration;
use marquee_db::dev::TestProject;
use marquee_db::models::*;
use marquee_db::utils::errors::{get_error_message, ErrorCode};

#[test]
fn create() {
    let project = TestProject::new();
    let user = project.create_user().finish();
    let plan = project.create_subscription_plan().finish();

    let subscription = Subscription::create(&user, &plan, &mut project.get_connection()).unwrap();
    assert_eq!(subscription.user_id, user.id);
    assert_eq!(subscription.subscription_plan_id, plan.id);
    assert_eq!(subscription.status, SubscriptionStatus::Pending);
    assert_eq!(subscription.start_date, None);
    assert_eq!(subscription.end_date, None);

    let logs = AuditLog::find(
        Tables::Subscriptions,
        Some(subscription.id),
        Some(AuditEvents::SubscriptionCreated),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn create_requires_published_plan() {
    let project = TestProject::new();
    let user = project.create_user().finish();
    let plan = project.create_subscription_plan().retired().finish();

    let result = Subscription::create(&user, &plan, &mut project.get_connection());
    let error = result.err().unwrap();
    assert_eq!(error.code, get_error_message(&ErrorCode::BusinessProcessError).0);
    assert!(error.cause.as_ref().unwrap().contains("not available"));
}

#[test]
fn create_supersedes_pending() {
    let project = TestProject::new();
    let user = project.create_user().finish();
    let plan = project.create_subscription_plan().finish();
    let other_plan = project.create_subscription_plan().finish();

    let first = Subscription::create(&user, &plan, &mut project.get_connection()).unwrap();
    let second = Subscription::create(&user, &other_plan, &mut project.get_connection()).unwrap();

    let first = Subscription::find(first.id, &mut project.get_connection()).unwrap();
    assert_eq!(first.status, SubscriptionStatus::Cancelled);
    assert_eq!(second.status, SubscriptionStatus::Pending);
    assert_eq!(second.subscription_plan_id, other_plan.id);
}

#[test]
fn create_refused_while_active() {
    let project = TestProject::new();
    let user = project.create_user().finish();
    let plan = project.create_subscription_plan().finish();
    project.create_subscription().for_user(&user).active().finish();

    let result = Subscription::create(&user, &plan, &mut project.get_connection());
    let error = result.err().unwrap();
    assert_eq!(error.code, get_error_message(&ErrorCode::BusinessProcessError).0);
    assert!(error.cause.as_ref().unwrap().contains("already has an active subscription"));
}

#[test]
fn activate() {
    let project = TestProject::new();
    let plan = project.create_subscription_plan().with_duration_days(30).finish();
    let subscription = project.create_subscription().with_plan(&plan).finish();

    let subscription = subscription.activate(&mut project.get_connection()).unwrap();
    assert_eq!(subscription.status, SubscriptionStatus::Active);

    let start_date = subscription.start_date.unwrap();
    let end_date = subscription.end_date.unwrap();
    assert_eq!(end_date, start_date + Duration::days(30));

    // activating twice leaves the dates alone
    let again = subscription.activate(&mut project.get_connection()).unwrap();
    assert_eq!(again.start_date, subscription.start_date);

    let logs = AuditLog::find(
        Tables::Subscriptions,
        Some(subscription.id),
        Some(AuditEvents::SubscriptionActivated),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn cancel() {
    let project = TestProject::new();
    let subscription = project.create_subscription().active().finish();

    let cancelled = subscription.cancel(None, &mut project.get_connection()).unwrap();
    assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);

    let result = cancelled.cancel(None, &mut project.get_connection());
    let error = result.err().unwrap();
    assert_eq!(error.code, get_error_message(&ErrorCode::BusinessProcessError).0);
}

#[test]
fn cancel_pending() {
    let project = TestProject::new();
    let subscription = project.create_subscription().finish();
    assert_eq!(subscription.status, SubscriptionStatus::Pending);

    let cancelled = subscription.cancel(None, &mut project.get_connection()).unwrap();
    assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);
}

#[test]
fn active_for_user() {
    let project = TestProject::new();
    let user = project.create_user().finish();

    let found = Subscription::active_for_user(user.id, &mut project.get_connection()).unwrap();
    assert!(found.is_none());

    let subscription = project.create_subscription().for_user(&user).active().finish();
    let found = Subscription::active_for_user(user.id, &mut project.get_connection()).unwrap();
    assert_eq!(found.unwrap().id, subscription.id);
}

#[test]
fn active_for_user_expires_lazily() {
    let project = TestProject::new();
    let user = project.create_user().finish();
    let subscription = project
        .create_subscription()
        .for_user(&user)
        .active()
        .with_end_date(Utc::now().naive_utc() - Duration::days(1))
        .finish();

    let found = Subscription::active_for_user(user.id, &mut project.get_connection()).unwrap();
    assert!(found.is_none());

    // the read flipped the row over
    let subscription = Subscription::find(subscription.id, &mut project.get_connection()).unwrap();
    assert_eq!(subscription.status, SubscriptionStatus::Expired);

    let logs = AuditLog::find(
        Tables::Subscriptions,
        Some(subscription.id),
        Some(AuditEvents::SubscriptionExpired),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn current_for_user() {
    let project = TestProject::new();
    let user = project.create_user().finish();

    assert!(Subscription::current_for_user(user.id, &mut project.get_connection())
        .unwrap()
        .is_none());

    // a pending subscription counts as current
    let subscription = project.create_subscription().for_user(&user).finish();
    let found = Subscription::current_for_user(user.id, &mut project.get_connection()).unwrap();
    assert_eq!(found.unwrap().id, subscription.id);
}

#[test]
fn current_for_user_expires_lazily() {
    let project = TestProject::new();
    let user = project.create_user().finish();
    project
        .create_subscription()
        .for_user(&user)
        .active()
        .with_end_date(Utc::now().naive_utc() - Duration::hours(1))
        .finish();

    let found = Subscription::current_for_user(user.id, &mut project.get_connection()).unwrap();
    assert!(found.is_none());
}

#[test]
fn is_past_end() {
    let project = TestProject::new();
    let now = Utc::now().naive_utc();

    let pending = project.create_subscription().finish();
    assert!(!pending.is_past_end(now));

    let active = project.create_subscription().active().finish();
    assert!(!active.is_past_end(now));
    assert!(active.is_past_end(now + Duration::days(31)));
}

#[test]
fn for_display() {
    let project = TestProject::new();
    let plan = project.create_subscription_plan().finish();
    let subscription = project.create_subscription().with_plan(&plan).active().finish();

    let display = subscription
        .clone()
        .for_display(&mut project.get_connection())
        .unwrap();
    assert_eq!(display.id, subscription.id);
    assert_eq!(display.status, SubscriptionStatus::Active);
    assert_eq!(display.plan.id, plan.id);
    assert_eq!(display.plan.name, plan.name);
}
