use crate::auth::user::User as AuthUser;
use crate::db::Connection;
use crate::errors::*;
use crate::extractors::*;
use crate::helpers::application;
use crate::models::PathParameters;
use actix_web::web::Path;
use actix_web::HttpResponse;
use marquee_db::models::*;

pub async fn index(connection: Connection) -> Result<HttpResponse, ApiError> {
    let mut connection = connection.get();
    let connection = &mut *connection;

    let plans = SubscriptionPlan::published(connection)?;
    Ok(HttpResponse::Ok().json(&plans))
}

pub async fn show(
    (connection, path, user): (Connection, Path<PathParameters>, OptionalUser),
) -> Result<HttpResponse, ApiError> {
    let mut connection = connection.get();
    let connection = &mut *connection;

    let plan = SubscriptionPlan::find(path.id, connection)?;
    if !plan.is_published() && !can_manage_plans(&user) {
        return application::not_found();
    }

    Ok(HttpResponse::Ok().json(&plan))
}

pub async fn create(
    (connection, new_plan, user): (Connection, Json<NewSubscriptionPlan>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::PlanWrite)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let plan = new_plan.into_inner().commit(connection)?;
    Ok(HttpResponse::Created().json(&plan))
}

pub async fn update(
    (connection, path, plan_parameters, user): (
        Connection,
        Path<PathParameters>,
        Json<SubscriptionPlanEditableAttributes>,
        AuthUser,
    ),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::PlanWrite)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let plan = SubscriptionPlan::find(path.id, connection)?;
    let updated_plan = plan.update(plan_parameters.into_inner(), connection)?;
    Ok(HttpResponse::Ok().json(&updated_plan))
}

/// Plans are never deleted outright; delete retires them so running
/// subscriptions keep their pricing history.
pub async fn destroy(
    (connection, path, user): (Connection, Path<PathParameters>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::PlanWrite)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let plan = SubscriptionPlan::find(path.id, connection)?;
    let retired_plan = plan.retire(connection)?;
    Ok(HttpResponse::Ok().json(&retired_plan))
}

fn can_manage_plans(user: &OptionalUser) -> bool {
    user.0.as_ref().map(|u| u.has_scope(Scopes::PlanWrite)).unwrap_or(false)
}
