use crate::models::*;
use crate::schema::subscriptions;
use crate::utils::errors::*;
use chrono::prelude::*;
use chrono::Duration;
use diesel;
use diesel::dsl;
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, QueryableByName, Serialize)]
#[diesel(table_name = subscriptions)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_plan_id: Uuid,
    pub status: SubscriptionStatus,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = subscriptions)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub subscription_plan_id: Uuid,
    pub status: SubscriptionStatus,
}

/// Subscription with its plan embedded, the shape `/subscriptions/current`
/// returns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplaySubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: SubscriptionStatus,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub plan: SubscriptionPlan,
}

impl NewSubscription {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<Subscription, DatabaseError> {
        let result: Subscription = diesel::insert_into(subscriptions::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new subscription")?;

        AuditLog::create(
            AuditEvents::SubscriptionCreated,
            "Subscription created".to_string(),
            Tables::Subscriptions,
            Some(result.id),
            Some(self.user_id),
            Some(json!({"subscription_plan_id": self.subscription_plan_id})),
        )
        .commit(conn)?;

        Ok(result)
    }
}

impl Subscription {
    /// Starts a Pending subscription for the user. An Active one refuses, a
    /// Pending one is superseded. The partial unique index on live
    /// subscriptions backs this check against races.
    pub fn create(user: &User, plan: &SubscriptionPlan, conn: &mut PgConnection) -> Result<Subscription, DatabaseError> {
        if !plan.is_published() {
            return DatabaseError::business_process_error("Subscription plan is not available");
        }

        if let Some(live) = Subscription::live_for_user(user.id, conn)? {
            match live.status {
                SubscriptionStatus::Active => {
                    return DatabaseError::business_process_error("User already has an active subscription");
                }
                _ => {
                    live.cancel_superseded(conn)?;
                }
            }
        }

        NewSubscription {
            user_id: user.id,
            subscription_plan_id: plan.id,
            status: SubscriptionStatus::Pending,
        }
        .commit(conn)
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Subscription, DatabaseError> {
        subscriptions::table
            .find(id)
            .first::<Subscription>(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading subscription")
    }

    /// The user's Active subscription, if any. Reads are where expiry
    /// happens: an Active row past its end date flips to Expired before the
    /// answer goes out.
    pub fn active_for_user(user_id: Uuid, conn: &mut PgConnection) -> Result<Option<Subscription>, DatabaseError> {
        let subscription = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::status.eq(SubscriptionStatus::Active))
            .first::<Subscription>(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading subscription")
            .optional()?;

        match subscription {
            Some(subscription) if subscription.is_past_end(Utc::now().naive_utc()) => {
                subscription.expire(conn)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// The user's live (Pending or Active) subscription with lazy expiry
    /// applied.
    pub fn current_for_user(user_id: Uuid, conn: &mut PgConnection) -> Result<Option<Subscription>, DatabaseError> {
        let subscription = Subscription::live_for_user(user_id, conn)?;
        match subscription {
            Some(subscription)
                if subscription.status == SubscriptionStatus::Active
                    && subscription.is_past_end(Utc::now().naive_utc()) =>
            {
                subscription.expire(conn)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn live_for_user(user_id: Uuid, conn: &mut PgConnection) -> Result<Option<Subscription>, DatabaseError> {
        subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::status.eq_any(vec![SubscriptionStatus::Pending, SubscriptionStatus::Active]))
            .first::<Subscription>(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading subscription")
            .optional()
    }

    /// Activation on payment completion. Start runs from now for the plan's
    /// full duration.
    pub fn activate(&self, conn: &mut PgConnection) -> Result<Subscription, DatabaseError> {
        if self.status == SubscriptionStatus::Active {
            return Subscription::find(self.id, conn);
        }

        let plan = SubscriptionPlan::find(self.subscription_plan_id, conn)?;
        let start_date = Utc::now().naive_utc();
        let end_date = start_date + Duration::days(plan.duration_days);

        let rows_affected = diesel::update(
            subscriptions::table
                .filter(subscriptions::id.eq(self.id))
                .filter(subscriptions::status.eq(SubscriptionStatus::Pending)),
        )
        .set((
            subscriptions::status.eq(SubscriptionStatus::Active),
            subscriptions::start_date.eq(Some(start_date)),
            subscriptions::end_date.eq(Some(end_date)),
            subscriptions::updated_at.eq(dsl::now),
        ))
        .execute(conn)
        .to_db_error(ErrorCode::UpdateError, "Could not activate subscription")?;
        if rows_affected == 0 {
            return DatabaseError::concurrency_error("Could not activate subscription because it is no longer pending");
        }

        AuditLog::create(
            AuditEvents::SubscriptionActivated,
            format!("Subscription to '{}' activated", plan.name),
            Tables::Subscriptions,
            Some(self.id),
            Some(self.user_id),
            Some(json!({"start_date": start_date, "end_date": end_date})),
        )
        .commit(conn)?;

        Subscription::find(self.id, conn)
    }

    pub fn cancel(&self, current_user_id: Option<Uuid>, conn: &mut PgConnection) -> Result<Subscription, DatabaseError> {
        match self.status {
            SubscriptionStatus::Pending | SubscriptionStatus::Active => (),
            _ => {
                return DatabaseError::business_process_error("Subscription is already cancelled or expired");
            }
        }

        let subscription: Subscription = diesel::update(self)
            .set((
                subscriptions::status.eq(SubscriptionStatus::Cancelled),
                subscriptions::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not cancel subscription")?;

        AuditLog::create(
            AuditEvents::SubscriptionCancelled,
            "Subscription cancelled".to_string(),
            Tables::Subscriptions,
            Some(self.id),
            current_user_id,
            Some(json!({"previous_status": self.status})),
        )
        .commit(conn)?;

        Ok(subscription)
    }

    pub fn is_past_end(&self, now: NaiveDateTime) -> bool {
        match self.end_date {
            Some(end_date) => end_date <= now,
            None => false,
        }
    }

    pub fn for_display(self, conn: &mut PgConnection) -> Result<DisplaySubscription, DatabaseError> {
        let plan = SubscriptionPlan::find(self.subscription_plan_id, conn)?;
        Ok(DisplaySubscription {
            id: self.id,
            user_id: self.user_id,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
            plan,
        })
    }

    fn cancel_superseded(&self, conn: &mut PgConnection) -> Result<Subscription, DatabaseError> {
        let subscription: Subscription = diesel::update(self)
            .set((
                subscriptions::status.eq(SubscriptionStatus::Cancelled),
                subscriptions::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not cancel superseded subscription")?;

        AuditLog::create(
            AuditEvents::SubscriptionCancelled,
            "Pending subscription superseded".to_string(),
            Tables::Subscriptions,
            Some(self.id),
            Some(self.user_id),
            None,
        )
        .commit(conn)?;

        Ok(subscription)
    }

    fn expire(&self, conn: &mut PgConnection) -> Result<Subscription, DatabaseError> {
        let rows_affected = diesel::update(
            subscriptions::table
                .filter(subscriptions::id.eq(self.id))
                .filter(subscriptions::status.eq(SubscriptionStatus::Active)),
        )
        .set((
            subscriptions::status.eq(SubscriptionStatus::Expired),
            subscriptions::updated_at.eq(dsl::now),
        ))
        .execute(conn)
        .to_db_error(ErrorCode::UpdateError, "Could not expire subscription")?;

        // Another request may have expired it first; either way it is done
        if rows_affected > 0 {
            AuditLog::create(
                AuditEvents::SubscriptionExpired,
                "Subscription expired".to_string(),
                Tables::Subscriptions,
                Some(self.id),
                None,
                Some(json!({"end_date": self.end_date})),
            )
            .commit(conn)?;
        }

        Subscription::find(self.id, conn)
    }
}
