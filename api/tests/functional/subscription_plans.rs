use crate::functional::base;
use crate::support;
use crate::support::database::TestDatabase;
use actix_web::http::StatusCode;
use actix_web::web::Path;
use marquee_api::controllers::subscription_plans;
use marquee_api::extractors::*;
use marquee_api::models::PathParameters;
use marquee_db::models::*;

#[actix_rt::test]
async fn index_lists_published_plans() {
    let database = TestDatabase::new();
    let plan = database.create_subscription_plan().finish();
    database.create_subscription_plan().retired().finish();

    let response = support::unwrap_response(subscription_plans::index(database.connection.clone().into()).await);

    assert_eq!(response.status(), StatusCode::OK);
    let body = support::unwrap_body_to_string(response).await;
    let plans: Vec<SubscriptionPlan> = serde_json::from_str(&body).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].id, plan.id);
}

#[actix_rt::test]
async fn show() {
    let database = TestDatabase::new();
    let plan = database.create_subscription_plan().finish();

    let path = Path::from(PathParameters { id: plan.id });
    let response = support::unwrap_response(
        subscription_plans::show((database.connection.clone().into(), path, OptionalUser(None))).await,
    );

    assert_eq!(response.status(), StatusCode::OK);
    let body = support::unwrap_body_to_string(response).await;
    let found: SubscriptionPlan = serde_json::from_str(&body).unwrap();
    assert_eq!(found.id, plan.id);
}

#[actix_rt::test]
async fn show_retired_plan_hidden_from_public() {
    let database = TestDatabase::new();
    let plan = database.create_subscription_plan().retired().finish();

    let path = Path::from(PathParameters { id: plan.id });
    let response = support::unwrap_response(
        subscription_plans::show((database.connection.clone().into(), path, OptionalUser(None))).await,
    );

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = support::unwrap_body_to_string(response).await;
    assert_eq!(body, json!({"error": "Not found"}).to_string());
}

#[actix_rt::test]
async fn show_retired_plan_visible_to_admin() {
    let database = TestDatabase::new();
    let plan = database.create_subscription_plan().retired().finish();
    let auth_user = support::create_auth_user(Roles::Admin, &database);

    let path = Path::from(PathParameters { id: plan.id });
    let response = support::unwrap_response(
        subscription_plans::show((
            database.connection.clone().into(),
            path,
            OptionalUser(Some(auth_user)),
        ))
        .await,
    );

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn create_admin() {
    base::subscription_plans::create(Roles::Admin, true).await;
}

#[actix_rt::test]
async fn create_staff() {
    base::subscription_plans::create(Roles::Staff, false).await;
}

#[actix_rt::test]
async fn create_user() {
    base::subscription_plans::create(Roles::User, false).await;
}

#[actix_rt::test]
async fn update_admin() {
    base::subscription_plans::update(Roles::Admin, true).await;
}

#[actix_rt::test]
async fn update_user() {
    base::subscription_plans::update(Roles::User, false).await;
}

#[actix_rt::test]
async fn destroy_admin() {
    base::subscription_plans::destroy(Roles::Admin, true).await;
}

#[actix_rt::test]
async fn destroy_staff() {
    base::subscription_plans::destroy(Roles::Staff, false).await;
}

#[actix_rt::test]
async fn destroy_user() {
    base::subscription_plans::destroy(Roles::User, false).await;
}
