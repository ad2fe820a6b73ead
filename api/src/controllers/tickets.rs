use crate::auth::user::User as AuthUser;
use crate::controllers::payments::{checkout_block, CURRENCY};
use crate::db::Connection;
use crate::errors::*;
use crate::extractors::*;
use crate::helpers::application;
use crate::mail::mailers;
use crate::models::PathParameters;
use crate::server::GetAppState;
use actix_web::web::{Path, Query};
use actix_web::{HttpRequest, HttpResponse};
use chrono::prelude::*;
use marquee_db::models::User as DbUser;
use marquee_db::models::*;
use marquee_db::utils::errors::{DatabaseError, Optional};
use razorpay::CreateOrderRequest;
use std::collections::HashMap;
use validator::Validate;

#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct PurchaseTicketsRequest {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
    #[serde(default)]
    pub free_access: bool,
    #[validate]
    pub guest: Option<GuestCheckoutAttributes>,
}

#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct GuestCheckoutAttributes {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    pub phone: Option<String>,
}

pub async fn purchase(
    (http_request, connection, path, purchase_request, user): (
        HttpRequest,
        Connection,
        Path<PathParameters>,
        Json<PurchaseTicketsRequest>,
        OptionalUser,
    ),
) -> Result<HttpResponse, ApiError> {
    let state = http_request.state();
    let purchase_request = purchase_request.into_inner();
    purchase_request.validate().map_err(DatabaseError::from)?;
    let auth_user = user.into_inner();

    if purchase_request.free_access {
        let auth_user = match auth_user {
            Some(user) => user,
            None => {
                return application::unauthorized_with_message(
                    "Free access requires a signed in member",
                    &http_request,
                    None,
                );
            }
        };
        if purchase_request.quantity != 1 {
            return application::unprocessable("Free access covers a single ticket");
        }

        let mut connection = connection.get();
        let connection = &mut *connection;
        let event = Event::find(path.id, connection)?;
        let pricing = event.pricing_for_user(Some(&auth_user.user), connection)?;
        if !pricing.free_access_available {
            return application::unprocessable("Free access is not available for this member");
        }

        let ticket = Ticket::create_free_access(&event, &auth_user.user, connection)?;
        mailers::deliver_or_log(mailers::tickets::confirmation_email(
            &state.config,
            auth_user.user.email.clone(),
            auth_user.user.full_name(),
            &ticket,
            &event,
        ));
        return Ok(HttpResponse::Created().json(&ticket));
    }

    // Paid checkout. Everything except the gateway call runs on the request
    // transaction; the connection guard cannot be held across the await.
    let (event, ticket, total_price_in_cents) = {
        let mut connection = connection.get();
        let connection = &mut *connection;

        let (purchaser, guest) = match &auth_user {
            Some(user) => (user.user.clone(), None),
            None => {
                let guest = match purchase_request.guest.clone() {
                    Some(guest) => guest,
                    None => {
                        return application::unauthorized_with_message(
                            "Sign in or supply guest details to purchase",
                            &http_request,
                            None,
                        );
                    }
                };
                let purchaser = match DbUser::find_by_email(&guest.email, connection).optional()? {
                    Some(user) => user,
                    None => DbUser::create_guest(&guest.first_name, &guest.last_name, &guest.email, guest.phone.clone())
                        .commit(connection)?,
                };
                (purchaser, Some(guest))
            }
        };

        let event = Event::find(path.id, connection)?;
        let now = Utc::now().naive_utc();
        if !event.is_purchasable(now) {
            return application::unprocessable("Event is not open for sale");
        }
        // Capacity is only claimed when the payment lands, but there is no
        // point sending an obviously doomed order to the gateway
        if event.remaining_tickets() < purchase_request.quantity {
            return application::unprocessable("Event is sold out");
        }

        let pricing = event.pricing_for_user(auth_user.as_ref().map(|u| &u.user), connection)?;
        let total_price_in_cents = pricing.price_in_cents * purchase_request.quantity;

        let ticket = Ticket::create(
            event.id,
            purchaser.id,
            purchase_request.quantity,
            total_price_in_cents,
            guest.as_ref().map(|g| format!("{} {}", g.first_name, g.last_name)),
            guest.as_ref().map(|g| g.email.clone()),
        )
        .commit(auth_user.as_ref().map(|u| u.id()), connection)?;

        (event, ticket, total_price_in_cents)
    };

    let mut notes = HashMap::new();
    notes.insert("kind".to_string(), "ticket".to_string());
    notes.insert("ticket_id".to_string(), ticket.id.to_string());
    notes.insert("event".to_string(), event.name.clone());
    let order = state
        .config
        .razorpay_client
        .create_order(CreateOrderRequest {
            amount: total_price_in_cents,
            // Razorpay wants the ISO code uppercased
            currency: CURRENCY.to_uppercase(),
            receipt: Some(ticket.id.to_string()),
            notes,
        })
        .await?;

    let mut connection = connection.get();
    let connection = &mut *connection;
    let payment = Payment::create(
        ticket.user_id,
        Some(ticket.id),
        None,
        PaymentProviders::Razorpay,
        order.id,
        total_price_in_cents,
        CURRENCY.to_string(),
    )
    .commit(connection)?;

    Ok(HttpResponse::Ok().json(json!({
        "ticket": ticket,
        "payment": checkout_block(&payment, &state.config.razorpay_key_id),
    })))
}

pub async fn index((connection, query, user): (Connection, Query<PagingParameters>, AuthUser)) -> Result<HttpResponse, ApiError> {
    let mut connection = connection.get();
    let connection = &mut *connection;

    let (tickets, total) = Ticket::find_for_user(user.id(), query.page(), query.limit(), connection)?;
    Ok(HttpResponse::Ok().json(Payload::new(tickets, query.into_inner().into(), total)))
}

pub async fn show(
    (connection, path, user): (Connection, Path<PathParameters>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    let mut connection = connection.get();
    let connection = &mut *connection;

    let ticket = Ticket::find(path.id, connection)?;
    if ticket.user_id != user.id() && !user.has_scope(Scopes::EventScan) {
        return application::forbidden("User does not have access to this ticket");
    }

    Ok(HttpResponse::Ok().json(&ticket))
}

#[derive(Deserialize)]
pub struct RedeemTicketRequest {
    pub redeem_key: String,
}

pub async fn redeem(
    (connection, path, redeem_request, user): (Connection, Path<PathParameters>, Json<RedeemTicketRequest>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::EventScan)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let result = Ticket::redeem_ticket(path.id, redeem_request.redeem_key.clone(), user.id(), connection)?;
    match result {
        RedeemResults::TicketRedeemSuccess(ticket) => Ok(HttpResponse::Ok().json(&ticket)),
        RedeemResults::TicketAlreadyRedeemed => application::unprocessable("Ticket has already been redeemed"),
        RedeemResults::TicketInvalid => application::unprocessable("Ticket is not valid for redemption"),
    }
}
