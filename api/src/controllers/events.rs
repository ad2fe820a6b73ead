use crate::auth::user::User as AuthUser;
use crate::db::Connection;
use crate::errors::*;
use crate::extractors::*;
use crate::helpers::application;
use crate::models::PathParameters;
use actix_web::web::{Path, Query};
use actix_web::HttpResponse;
use marquee_db::models::*;

pub async fn index((connection, query): (Connection, Query<PagingParameters>)) -> Result<HttpResponse, ApiError> {
    let mut connection = connection.get();
    let connection = &mut *connection;

    let past = query.get_tag("past").map(|p| p == "true").unwrap_or(false);
    let name_query = query.get_tag("query");
    let (events, total) = Event::search(name_query.as_deref(), past, query.page(), query.limit(), connection)?;

    Ok(HttpResponse::Ok().json(Payload::new(events, query.into_inner().into(), total)))
}

pub async fn show(
    (connection, path, user): (Connection, Path<PathParameters>, OptionalUser),
) -> Result<HttpResponse, ApiError> {
    let mut connection = connection.get();
    let connection = &mut *connection;

    let event = Event::find(path.id, connection)?;
    if event.status != EventStatus::Published && !can_manage_events(&user) {
        return application::not_found();
    }

    Ok(HttpResponse::Ok().json(&event))
}

pub async fn create(
    (connection, new_event, user): (Connection, Json<NewEvent>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::EventWrite)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let event = new_event.into_inner().commit(Some(user.id()), connection)?;
    Ok(HttpResponse::Created().json(&event))
}

pub async fn update(
    (connection, path, event_parameters, user): (
        Connection,
        Path<PathParameters>,
        Json<EventEditableAttributes>,
        AuthUser,
    ),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::EventWrite)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let event = Event::find(path.id, connection)?;
    let updated_event = event.update(Some(user.id()), event_parameters.into_inner(), connection)?;
    Ok(HttpResponse::Ok().json(&updated_event))
}

pub async fn publish(
    (connection, path, user): (Connection, Path<PathParameters>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::EventWrite)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let event = Event::find(path.id, connection)?;
    let published_event = event.publish(Some(user.id()), connection)?;
    Ok(HttpResponse::Ok().json(&published_event))
}

pub async fn cancel(
    (connection, path, user): (Connection, Path<PathParameters>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::EventWrite)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let event = Event::find(path.id, connection)?;
    let cancelled_event = event.cancel(Some(user.id()), connection)?;
    Ok(HttpResponse::Ok().json(&cancelled_event))
}

/// Effective pricing for the caller, anonymous callers included.
pub async fn pricing(
    (connection, path, user): (Connection, Path<PathParameters>, OptionalUser),
) -> Result<HttpResponse, ApiError> {
    let mut connection = connection.get();
    let connection = &mut *connection;

    let event = Event::find(path.id, connection)?;
    if event.status != EventStatus::Published && !can_manage_events(&user) {
        return application::not_found();
    }

    let user = user.into_inner();
    let pricing = event.pricing_for_user(user.as_ref().map(|u| &u.user), connection)?;
    Ok(HttpResponse::Ok().json(&pricing))
}

pub async fn door_list(
    (connection, path, query, user): (Connection, Path<PathParameters>, Query<PagingParameters>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::EventScan)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let event = Event::find(path.id, connection)?;
    let (door_list, total) = Ticket::door_list(event.id, query.page(), query.limit(), connection)?;

    Ok(HttpResponse::Ok().json(Payload::new(door_list, query.into_inner().into(), total)))
}

fn can_manage_events(user: &OptionalUser) -> bool {
    user.0.as_ref().map(|u| u.has_scope(Scopes::EventWrite)).unwrap_or(false)
}
