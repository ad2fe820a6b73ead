pub use self::event_builder::EventBuilder;
pub use self::payment_builder::PaymentBuilder;
pub use self::subscription_builder::SubscriptionBuilder;
pub use self::subscription_plan_builder::SubscriptionPlanBuilder;
pub use self::ticket_builder::TicketBuilder;
pub use self::user_builder::UserBuilder;

mod event_builder;
mod payment_builder;
mod subscription_builder;
mod subscription_plan_builder;
mod ticket_builder;
mod user_builder;
