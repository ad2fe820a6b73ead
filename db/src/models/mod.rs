pub use self::audit_logs::*;
pub use self::enums::*;
pub use self::events::*;
pub use self::paging::*;
pub use self::payments::*;
pub use self::roles::Roles;
pub use self::scopes::*;
pub use self::subscription_plans::*;
pub use self::subscriptions::*;
pub use self::tickets::*;
pub use self::users::*;

mod audit_logs;
pub mod enums;
mod events;
mod paging;
mod payments;
mod roles;
pub mod scopes;
mod subscription_plans;
mod subscriptions;
mod tickets;
mod users;
