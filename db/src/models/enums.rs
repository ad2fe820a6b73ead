use crate::utils::errors::EnumParseError;
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;
use std::str;
use std::str::FromStr;

macro_rules! string_enum {
    ($name:ident [$($value:ident),+]) => {

            #[derive(AsExpression, FromSqlRow, Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
            #[diesel(sql_type = Text)]
            pub enum $name {
                $(
                    $value,
                )*
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
                 let s = match self {
                      $(
                        $name::$value => stringify!($value),
                       )*
                    };
                    write!(f, "{}", s)
                }
            }

            impl FromStr for $name {
                type Err = EnumParseError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                  match s {
                      $(
                        stringify!($value) => Ok($name::$value),
                       )*
                        _ => Err(EnumParseError {
                            message: "Could not parse value".to_string(),
                            enum_type: stringify!($name).to_string(),
                            value: s.to_string(),
                        })
                    }
                }
            }

            impl ToSql<Text, Pg> for $name {
                fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                    out.write_all(self.to_string().as_bytes())?;
                    Ok(IsNull::No)
                }
            }

            impl FromSql<Text, Pg> for $name {
                fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
                    let s = str::from_utf8(value.as_bytes())?;
                    s.parse::<$name>().map_err(Into::into)
                }
            }
        }
}

string_enum! { EventStatus [Draft, Published, Cancelled, Closed] }
string_enum! { TicketStatus [Pending, Active, Redeemed, Cancelled] }
string_enum! { SubscriptionStatus [Pending, Active, Cancelled, Expired] }
string_enum! { PlanStatus [Published, Retired] }
string_enum! { PaymentStatus [Created, Completed, Failed, Cancelled] }
string_enum! { PaymentProviders [Razorpay] }
string_enum! { Tables [Users, Events, Tickets, SubscriptionPlans, Subscriptions, Payments] }
string_enum! { AuditEvents [
    CountsRepaired,
    EventCancelled,
    EventClosed,
    EventCreated,
    EventPublished,
    EventUpdated,
    FreeAccessGranted,
    GuestAccountClaimed,
    PaymentCompleted,
    PaymentCreated,
    PaymentFailed,
    PaymentVerificationFailed,
    SubscriptionActivated,
    SubscriptionCancelled,
    SubscriptionCreated,
    SubscriptionExpired,
    TicketActivated,
    TicketActivationFailed,
    TicketCancelled,
    TicketCreated,
    TicketRedeemed,
    UserCreated
] }
