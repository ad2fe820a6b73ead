use crate::models::*;
use crate::schema::subscription_plans;
use crate::utils::errors::*;
use chrono::NaiveDateTime;
use diesel;
use diesel::dsl;
use diesel::prelude::*;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, QueryableByName, Serialize)]
#[diesel(table_name = subscription_plans)]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub benefits: Vec<String>,
    pub price_in_cents: i64,
    pub duration_days: i64,
    pub status: PlanStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Serialize, Deserialize, Validate, Clone)]
#[diesel(table_name = subscription_plans)]
pub struct NewSubscriptionPlan {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters long"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[validate(range(min = 1, message = "Price must be greater than zero"))]
    pub price_in_cents: i64,
    #[validate(range(min = 1, message = "Duration must be at least one day"))]
    pub duration_days: i64,
    #[serde(default = "NewSubscriptionPlan::default_status", skip_deserializing)]
    pub status: PlanStatus,
}

#[derive(AsChangeset, Clone, Default, Deserialize, Serialize, Validate)]
#[diesel(table_name = subscription_plans)]
pub struct SubscriptionPlanEditableAttributes {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters long"))]
    pub name: Option<String>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub benefits: Option<Vec<String>>,
    #[validate(range(min = 1, message = "Price must be greater than zero"))]
    pub price_in_cents: Option<i64>,
    #[validate(range(min = 1, message = "Duration must be at least one day"))]
    pub duration_days: Option<i64>,
}

impl NewSubscriptionPlan {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<SubscriptionPlan, DatabaseError> {
        self.validate()?;
        diesel::insert_into(subscription_plans::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new subscription plan")
    }

    pub fn default_status() -> PlanStatus {
        PlanStatus::Published
    }
}

impl SubscriptionPlan {
    pub fn create(name: &str, price_in_cents: i64, duration_days: i64) -> NewSubscriptionPlan {
        NewSubscriptionPlan {
            name: name.to_string(),
            description: None,
            benefits: Vec::new(),
            price_in_cents,
            duration_days,
            status: PlanStatus::Published,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<SubscriptionPlan, DatabaseError> {
        subscription_plans::table
            .find(id)
            .first::<SubscriptionPlan>(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading subscription plan")
    }

    pub fn published(conn: &mut PgConnection) -> Result<Vec<SubscriptionPlan>, DatabaseError> {
        subscription_plans::table
            .filter(subscription_plans::status.eq(PlanStatus::Published))
            .order_by(subscription_plans::price_in_cents.asc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Could not load subscription plans")
    }

    pub fn update(
        &self,
        attributes: SubscriptionPlanEditableAttributes,
        conn: &mut PgConnection,
    ) -> Result<SubscriptionPlan, DatabaseError> {
        attributes.validate()?;
        DatabaseError::wrap(
            ErrorCode::UpdateError,
            "Could not update subscription plan",
            diesel::update(self)
                .set((&attributes, subscription_plans::updated_at.eq(dsl::now)))
                .get_result(conn),
        )
    }

    /// Retired plans disappear from the public index and refuse new
    /// subscriptions; running subscriptions on them finish out normally.
    pub fn retire(self, conn: &mut PgConnection) -> Result<SubscriptionPlan, DatabaseError> {
        diesel::update(&self)
            .set((
                subscription_plans::status.eq(PlanStatus::Retired),
                subscription_plans::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not retire subscription plan")
    }

    pub fn is_published(&self) -> bool {
        self.status == PlanStatus::Published
    }
}
