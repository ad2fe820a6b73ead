use crate::config::Config;
use crate::mail::mailers::Mailer;
use marquee_db::models::{Subscription, SubscriptionPlan};

pub fn activation_email(
    config: &Config,
    email: String,
    recipient_name: String,
    subscription: &Subscription,
    plan: &SubscriptionPlan,
) -> Mailer {
    let active_until = subscription
        .end_date
        .map(|date| date.format("%e %B %Y").to_string())
        .unwrap_or_else(|| "further notice".to_string());

    let body = format!(
        "Hi {},\n\n\
         Your {} membership is now active until {}. Member pricing and your \
         monthly free pass are available right away.\n\n\
         {}",
        recipient_name, plan.name, active_until, config.app_name,
    );

    Mailer::new(
        config.clone(),
        (email, recipient_name),
        (
            config.mail_from_address.clone(),
            config.mail_from_name.clone(),
        ),
        format!("Your {} membership is active", plan.name),
        body,
    )
}
