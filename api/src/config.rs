use crate::mail::transports::{SmtpTransport, TestTransport, Transport};
use dotenv::dotenv;
use razorpay::{RazorpayClient, RazorpayGateway, TestRazorpayClient, PROD_BASE_URL};
use std::env;

#[derive(Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Clone)]
pub struct Config {
    pub allowed_origins: String,
    pub api_host: String,
    pub api_port: String,
    pub app_name: String,
    pub database_url: String,
    pub database_pool_size: u32,
    pub environment: Environment,
    pub front_end_url: String,
    pub http_keep_alive: u64,
    pub mail_from_address: String,
    pub mail_from_name: String,
    pub mail_transport: Box<dyn Transport + Send + Sync>,
    pub razorpay_client: Box<dyn RazorpayGateway + Send + Sync>,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub razorpay_webhook_secret: String,
    pub token_secret: String,
    pub token_issuer: String,
}

const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
const APP_NAME: &str = "APP_NAME";
const API_HOST: &str = "API_HOST";
const API_PORT: &str = "API_PORT";
const DATABASE_URL: &str = "DATABASE_URL";
const DATABASE_POOL_SIZE: &str = "DATABASE_POOL_SIZE";
const FRONT_END_URL: &str = "FRONT_END_URL";
const HTTP_KEEP_ALIVE: &str = "HTTP_KEEP_ALIVE";
const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";
const TOKEN_SECRET: &str = "TOKEN_SECRET";
const TOKEN_ISSUER: &str = "TOKEN_ISSUER";

// Mail settings
const MAIL_FROM_ADDRESS: &str = "MAIL_FROM_ADDRESS";
const MAIL_FROM_NAME: &str = "MAIL_FROM_NAME";
const MAIL_SMTP_HOST: &str = "MAIL_SMTP_HOST";
const MAIL_SMTP_PORT: &str = "MAIL_SMTP_PORT";
const MAIL_SMTP_USER_NAME: &str = "MAIL_SMTP_USER_NAME";
const MAIL_SMTP_PASSWORD: &str = "MAIL_SMTP_PASSWORD";

// Razorpay settings
const RAZORPAY_KEY_ID: &str = "RAZORPAY_KEY_ID";
const RAZORPAY_KEY_SECRET: &str = "RAZORPAY_KEY_SECRET";
const RAZORPAY_WEBHOOK_SECRET: &str = "RAZORPAY_WEBHOOK_SECRET";

impl Config {
    pub fn new(environment: Environment) -> Self {
        dotenv().ok();

        let app_name = env::var(&APP_NAME).unwrap_or_else(|_| "Marquee".to_string());

        let database_url = match environment {
            Environment::Test => env::var(&TEST_DATABASE_URL)
                .unwrap_or_else(|_| panic!("{} must be defined.", TEST_DATABASE_URL)),
            _ => env::var(&DATABASE_URL).unwrap_or_else(|_| panic!("{} must be defined.", DATABASE_URL)),
        };

        let database_pool_size = env::var(&DATABASE_POOL_SIZE)
            .map(|s| s.parse().expect("Not a valid integer for database pool size"))
            .unwrap_or(20);

        let allowed_origins = env::var(&ALLOWED_ORIGINS).unwrap_or_else(|_| "*".to_string());
        let api_host = env::var(&API_HOST).unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = env::var(&API_PORT).unwrap_or_else(|_| "8088".to_string());

        // The test environment falls back to fixed values so the suite runs
        // without a fully populated .env. Everything still overrides normally.
        let testing = environment == Environment::Test;
        let required = |var: &'static str, test_default: &str| -> String {
            match env::var(var) {
                Ok(value) => value,
                Err(_) if testing => test_default.to_string(),
                Err(_) => panic!("{} must be defined.", var),
            }
        };

        let front_end_url = required(FRONT_END_URL, "http://localhost:3000");
        let token_secret = required(TOKEN_SECRET, "test_token_secret");
        let token_issuer = required(TOKEN_ISSUER, "marquee-test");

        let mail_from_address = required(MAIL_FROM_ADDRESS, "tickets@marquee.test");
        let mail_from_name = env::var(&MAIL_FROM_NAME).unwrap_or_else(|_| app_name.clone());
        let mail_smtp_host = env::var(&MAIL_SMTP_HOST).unwrap_or_else(|_| "localhost".to_string());
        let mail_smtp_port = env::var(&MAIL_SMTP_PORT)
            .unwrap_or_else(|_| "25".to_string())
            .parse()
            .expect("Not a valid integer for SMTP port");
        let mail_smtp_user_name = env::var(&MAIL_SMTP_USER_NAME).ok();
        let mail_smtp_password = env::var(&MAIL_SMTP_PASSWORD).ok();

        let mail_transport = match environment {
            Environment::Test => Box::new(TestTransport::new()) as Box<dyn Transport + Send + Sync>,
            _ => Box::new(SmtpTransport::new(
                &mail_smtp_host,
                mail_smtp_port,
                mail_smtp_user_name,
                mail_smtp_password,
            )) as Box<dyn Transport + Send + Sync>,
        };

        let razorpay_key_id = required(RAZORPAY_KEY_ID, "rzp_test_marquee");
        let razorpay_key_secret = required(RAZORPAY_KEY_SECRET, "test_key_secret");
        let razorpay_webhook_secret = required(RAZORPAY_WEBHOOK_SECRET, "test_webhook_secret");

        let razorpay_client = match environment {
            Environment::Test => {
                Box::new(TestRazorpayClient::new()) as Box<dyn RazorpayGateway + Send + Sync>
            }
            _ => Box::new(RazorpayClient::new(
                razorpay_key_id.clone(),
                razorpay_key_secret.clone(),
                PROD_BASE_URL.to_string(),
            )) as Box<dyn RazorpayGateway + Send + Sync>,
        };

        let http_keep_alive = env::var(&HTTP_KEEP_ALIVE)
            .unwrap_or_else(|_| "75".to_string())
            .parse()
            .expect("Not a valid integer for HTTP keep alive");

        Config {
            allowed_origins,
            api_host,
            api_port,
            app_name,
            database_url,
            database_pool_size,
            environment,
            front_end_url,
            http_keep_alive,
            mail_from_address,
            mail_from_name,
            mail_transport,
            razorpay_client,
            razorpay_key_id,
            razorpay_key_secret,
            razorpay_webhook_secret,
            token_secret,
            token_issuer,
        }
    }
}
