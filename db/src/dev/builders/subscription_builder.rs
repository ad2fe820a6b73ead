use crate::dev::builders::{SubscriptionPlanBuilder, UserBuilder};
use crate::models::{Subscription, SubscriptionPlan, User};
use crate::schema::subscriptions;
use chrono::NaiveDateTime;
use diesel;
use diesel::prelude::*;
use std::cell::RefCell;

pub struct SubscriptionBuilder<'a> {
    user: Option<User>,
    plan: Option<SubscriptionPlan>,
    active: bool,
    end_date: Option<NaiveDateTime>,
    connection: &'a RefCell<PgConnection>,
}

impl<'a> SubscriptionBuilder<'a> {
    pub fn new(connection: &'a RefCell<PgConnection>) -> Self {
        SubscriptionBuilder {
            user: None,
            plan: None,
            active: false,
            end_date: None,
            connection,
        }
    }

    pub fn for_user(mut self, user: &User) -> Self {
        self.user = Some(user.clone());
        self
    }

    pub fn with_plan(mut self, plan: &SubscriptionPlan) -> Self {
        self.plan = Some(plan.clone());
        self
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    /// Overrides the end date after activation, for expiry tests.
    pub fn with_end_date(mut self, end_date: NaiveDateTime) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn finish(&self) -> Subscription {
        let user = match &self.user {
            Some(user) => user.clone(),
            None => UserBuilder::new(self.connection).finish(),
        };
        let plan = match &self.plan {
            Some(plan) => plan.clone(),
            None => SubscriptionPlanBuilder::new(self.connection).finish(),
        };

        let mut connection = self.connection.borrow_mut();
        let connection = &mut *connection;
        let subscription = Subscription::create(&user, &plan, connection).unwrap();
        let subscription = if self.active {
            subscription.activate(connection).unwrap()
        } else {
            subscription
        };

        match self.end_date {
            Some(end_date) => diesel::update(&subscription)
                .set(subscriptions::end_date.eq(Some(end_date)))
                .get_result(connection)
                .unwrap(),
            None => subscription,
        }
    }
}
