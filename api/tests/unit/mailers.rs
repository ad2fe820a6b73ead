use crate::support::database::TestDatabase;
use marquee_api::config::{Config, Environment};
use marquee_api::mail::mailers;

#[test]
fn ticket_confirmation_email() {
    let database = TestDatabase::new();
    let event = database.create_event().with_name("Midnight Raaga").finish();
    let user = database.create_user().finish();
    let ticket = database.create_ticket().for_event(&event).for_user(&user).finish();
    let config = Config::new(Environment::Test);

    let mailer = mailers::tickets::confirmation_email(&config, user.email.clone(), user.full_name(), &ticket, &event);

    assert_eq!(mailer.to(), (user.email.clone(), user.full_name()));
    assert_eq!(mailer.from().0, config.mail_from_address);
    assert_eq!(mailer.subject(), "Your tickets for Midnight Raaga");
    assert!(mailer.body().contains(&ticket.redeem_key));
    assert!(mailer.body().contains(&event.venue));
    assert!(mailer.body().contains(&config.front_end_url));
}

#[test]
fn ticket_confirmation_email_for_guest() {
    let database = TestDatabase::new();
    let event = database.create_event().finish();
    let ticket = database
        .create_ticket()
        .for_event(&event)
        .as_guest("Dev Narayan", "dev@example.com")
        .finish();
    let config = Config::new(Environment::Test);

    let mailer = mailers::tickets::confirmation_email(
        &config,
        "dev@example.com".to_string(),
        "Dev Narayan".to_string(),
        &ticket,
        &event,
    );

    assert_eq!(mailer.to(), ("dev@example.com".to_string(), "Dev Narayan".to_string()));
    assert!(mailer.body().starts_with("Hi Dev Narayan,"));
}

#[test]
fn subscription_activation_email() {
    let database = TestDatabase::new();
    let plan = database.create_subscription_plan().with_name("Annual").finish();
    let user = database.create_user().finish();
    let subscription = database
        .create_subscription()
        .for_user(&user)
        .with_plan(&plan)
        .active()
        .finish();
    let config = Config::new(Environment::Test);

    let mailer =
        mailers::subscriptions::activation_email(&config, user.email.clone(), user.full_name(), &subscription, &plan);

    assert_eq!(mailer.to(), (user.email.clone(), user.full_name()));
    assert_eq!(mailer.subject(), "Your Annual membership is active");
    let active_until = subscription.end_date.unwrap().format("%e %B %Y").to_string();
    assert!(mailer.body().contains(&active_until));
    assert!(mailer.body().contains("monthly free pass"));
}
