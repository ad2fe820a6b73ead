use crate::models::SubscriptionPlan;
use diesel::PgConnection;
use std::cell::RefCell;
use uuid::Uuid;

pub struct SubscriptionPlanBuilder<'a> {
    name: String,
    description: Option<String>,
    benefits: Vec<String>,
    price_in_cents: i64,
    duration_days: i64,
    retired: bool,
    connection: &'a RefCell<PgConnection>,
}

impl<'a> SubscriptionPlanBuilder<'a> {
    pub fn new(connection: &'a RefCell<PgConnection>) -> Self {
        let x = Uuid::new_v4();
        SubscriptionPlanBuilder {
            name: format!("Monthly Membership {}", x),
            description: None,
            benefits: vec!["Member pricing".to_string(), "One free event each month".to_string()],
            price_in_cents: 99900,
            duration_days: 30,
            retired: false,
            connection,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_price(mut self, price_in_cents: i64) -> Self {
        self.price_in_cents = price_in_cents;
        self
    }

    pub fn with_duration_days(mut self, duration_days: i64) -> Self {
        self.duration_days = duration_days;
        self
    }

    pub fn retired(mut self) -> Self {
        self.retired = true;
        self
    }

    pub fn finish(&self) -> SubscriptionPlan {
        let mut connection = self.connection.borrow_mut();
        let connection = &mut *connection;
        let mut new_plan = SubscriptionPlan::create(&self.name, self.price_in_cents, self.duration_days);
        new_plan.description = self.description.clone();
        new_plan.benefits = self.benefits.clone();

        let plan = new_plan.commit(connection).unwrap();
        if self.retired {
            plan.retire(connection).unwrap()
        } else {
            plan
        }
    }
}
