pub mod audit_logs;
pub mod auth;
pub mod events;
pub mod payments;
pub mod status;
pub mod subscription_plans;
pub mod subscriptions;
pub mod tickets;
pub mod users;
pub mod webhooks;
