use dotenv::dotenv;
use marquee_api::config::{Config, Environment};
use marquee_api::server::Server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    logging::setup_logger();
    dotenv().ok();

    let config = Config::new(Environment::Development);
    Server::start(config).await
}
