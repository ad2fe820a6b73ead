use crate::controllers::*;
use actix_web::web;

pub fn routes(app: &mut web::ServiceConfig) {
    app.service(web::resource("/status").route(web::get().to(status::check)))
        .service(web::resource("/auth/token").route(web::post().to(auth::token)))
        .service(web::resource("/auth/token/refresh").route(web::post().to(auth::token_refresh)))
        .service(web::resource("/users/register").route(web::post().to(users::register)))
        .service(web::resource("/users/me").route(web::get().to(users::current_user)))
        .service(
            web::resource("/events")
                .route(web::get().to(events::index))
                .route(web::post().to(events::create)),
        )
        .service(
            web::resource("/events/{id}")
                .route(web::get().to(events::show))
                .route(web::put().to(events::update)),
        )
        .service(web::resource("/events/{id}/publish").route(web::post().to(events::publish)))
        .service(web::resource("/events/{id}/cancel").route(web::post().to(events::cancel)))
        .service(web::resource("/events/{id}/pricing").route(web::get().to(events::pricing)))
        .service(
            web::resource("/events/{id}/tickets")
                .route(web::get().to(events::door_list))
                .route(web::post().to(tickets::purchase)),
        )
        .service(web::resource("/tickets").route(web::get().to(tickets::index)))
        .service(web::resource("/tickets/{id}").route(web::get().to(tickets::show)))
        .service(web::resource("/tickets/{id}/redeem").route(web::post().to(tickets::redeem)))
        .service(
            web::resource("/subscription_plans")
                .route(web::get().to(subscription_plans::index))
                .route(web::post().to(subscription_plans::create)),
        )
        .service(
            web::resource("/subscription_plans/{id}")
                .route(web::get().to(subscription_plans::show))
                .route(web::put().to(subscription_plans::update))
                .route(web::delete().to(subscription_plans::destroy)),
        )
        .service(web::resource("/subscriptions").route(web::post().to(subscriptions::create)))
        .service(web::resource("/subscriptions/current").route(web::get().to(subscriptions::current)))
        .service(web::resource("/subscriptions/{id}/cancel").route(web::post().to(subscriptions::cancel)))
        .service(web::resource("/payments/verify").route(web::post().to(payments::verify)))
        .service(web::resource("/webhooks/razorpay").route(web::post().to(webhooks::razorpay)))
        .service(web::resource("/admin/audit_logs").route(web::get().to(audit_logs::index)));
}
