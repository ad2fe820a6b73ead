use crate::config::Config;
use crate::db::Database;
use crate::middleware::{DatabaseTransaction, MarqueeLogger};
use crate::routing;
use actix_cors::Cors;
use actix_web::dev::ServiceRequest;
use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use log::Level::Info;
use std::io;
use std::time::Duration;

pub struct AppState {
    pub config: Config,
    pub database: Database,
}

impl AppState {
    pub fn new(config: Config) -> AppState {
        let database = Database::from_config(&config);
        AppState { config, database }
    }
}

pub trait GetAppState {
    fn state(&self) -> &AppState;
}

impl GetAppState for HttpRequest {
    fn state(&self) -> &AppState {
        self.app_data::<Data<AppState>>()
            .map(|data| data.get_ref())
            .expect("AppState is not configured")
    }
}

impl GetAppState for ServiceRequest {
    fn state(&self) -> &AppState {
        self.app_data::<Data<AppState>>()
            .map(|data| data.get_ref())
            .expect("AppState is not configured")
    }
}

pub struct Server;

impl Server {
    pub async fn start(config: Config) -> io::Result<()> {
        let bind_address = format!("{}:{}", config.api_host, config.api_port);
        let keep_alive = config.http_keep_alive;
        let allowed_origins = config.allowed_origins.clone();

        jlog!(Info, "api::server", "Starting server", {
            "bind_address": bind_address.clone(),
            "version": env!("CARGO_PKG_VERSION")
        });

        let state = Data::new(AppState::new(config));

        HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .app_data(web::JsonConfig::default().limit(262_144))
                .wrap(DatabaseTransaction::new())
                .wrap(cors(&allowed_origins))
                .wrap(MarqueeLogger::new())
                .configure(routing::routes)
                .default_service(web::route().to(not_found))
        })
        .keep_alive(Duration::from_secs(keep_alive))
        .bind(&bind_address)?
        .run()
        .await
    }
}

fn cors(allowed_origins: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    if allowed_origins == "*" {
        return cors.allow_any_origin();
    }
    allowed_origins
        .split(',')
        .fold(cors, |cors, origin| cors.allowed_origin(origin.trim()))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": "Not found"}))
}
