use crate::auth::user::User as AuthUser;
use crate::controllers::payments::{checkout_block, CURRENCY};
use crate::db::Connection;
use crate::errors::*;
use crate::extractors::*;
use crate::helpers::application;
use crate::models::PathParameters;
use crate::server::GetAppState;
use actix_web::web::Path;
use actix_web::{HttpRequest, HttpResponse};
use marquee_db::models::*;
use razorpay::CreateOrderRequest;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct CreateSubscriptionRequest {
    pub subscription_plan_id: Uuid,
}

pub async fn create(
    (http_request, connection, create_request, user): (
        HttpRequest,
        Connection,
        Json<CreateSubscriptionRequest>,
        AuthUser,
    ),
) -> Result<HttpResponse, ApiError> {
    let state = http_request.state();

    let (plan, subscription) = {
        let mut connection = connection.get();
        let connection = &mut *connection;
        let plan = SubscriptionPlan::find(create_request.subscription_plan_id, connection)?;
        let subscription = Subscription::create(&user.user, &plan, connection)?;
        (plan, subscription)
    };

    let mut notes = HashMap::new();
    notes.insert("kind".to_string(), "subscription".to_string());
    notes.insert("subscription_id".to_string(), subscription.id.to_string());
    notes.insert("plan".to_string(), plan.name.clone());
    let order = state
        .config
        .razorpay_client
        .create_order(CreateOrderRequest {
            amount: plan.price_in_cents,
            currency: CURRENCY.to_uppercase(),
            receipt: Some(subscription.id.to_string()),
            notes,
        })
        .await?;

    let mut connection = connection.get();
    let connection = &mut *connection;
    let payment = Payment::create(
        user.id(),
        None,
        Some(subscription.id),
        PaymentProviders::Razorpay,
        order.id,
        plan.price_in_cents,
        CURRENCY.to_string(),
    )
    .commit(connection)?;

    Ok(HttpResponse::Ok().json(json!({
        "subscription": subscription,
        "payment": checkout_block(&payment, &state.config.razorpay_key_id),
    })))
}

pub async fn current((connection, user): (Connection, AuthUser)) -> Result<HttpResponse, ApiError> {
    let mut connection = connection.get();
    let connection = &mut *connection;

    match Subscription::current_for_user(user.id(), connection)? {
        Some(subscription) => Ok(HttpResponse::Ok().json(subscription.for_display(connection)?)),
        None => application::not_found(),
    }
}

pub async fn cancel(
    (connection, path, user): (Connection, Path<PathParameters>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    let mut connection = connection.get();
    let connection = &mut *connection;

    let subscription = Subscription::find(path.id, connection)?;
    if subscription.user_id != user.id() && !user.user.is_admin() {
        return application::forbidden("User does not have access to this subscription");
    }

    let cancelled = subscription.cancel(Some(user.id()), connection)?;
    Ok(HttpResponse::Ok().json(&cancelled))
}
