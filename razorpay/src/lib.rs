extern crate async_trait;
extern crate hex;
extern crate hmac;
extern crate log;
#[macro_use]
extern crate logging;
extern crate reqwest;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
extern crate sha2;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use log::Level::Debug;
use reqwest::StatusCode;
use sha2::Sha256;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, Mutex};

type HmacSha256 = Hmac<Sha256>;

pub const PROD_BASE_URL: &str = "https://api.razorpay.com/v1/";

/// Minimal Razorpay Orders client. Amounts are in the currency's smallest
/// unit (paise for INR), matching what the rest of the system stores.
#[async_trait]
pub trait RazorpayGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<RazorpayOrder, RazorpayError>;
    fn box_clone(&self) -> Box<dyn RazorpayGateway + Send + Sync>;
}

impl Clone for Box<dyn RazorpayGateway + Send + Sync> {
    fn clone(&self) -> Box<dyn RazorpayGateway + Send + Sync> {
        self.box_clone()
    }
}

#[derive(Clone)]
pub struct RazorpayClient {
    key_id: String,
    key_secret: String,
    base_url: String,
    client: reqwest::Client,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String, base_url: String) -> RazorpayClient {
        RazorpayClient {
            key_id,
            key_secret,
            base_url: if base_url.ends_with("/") {
                base_url
            } else {
                format!("{}/", base_url)
            },
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RazorpayGateway for RazorpayClient {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<RazorpayOrder, RazorpayError> {
        jlog!(Debug, "razorpay::client", "Creating Razorpay order", {
            "amount": request.amount,
            "currency": &request.currency,
            "receipt": &request.receipt
        });

        let resp = self
            .client
            .post(&format!("{}orders", &self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::BAD_REQUEST {
            return Err(RazorpayError::UnexpectedResponseError(format!(
                "Unexpected status code from Razorpay: {}",
                status
            )));
        }
        let value: serde_json::Value = resp.json().await?;
        jlog!(Debug, "razorpay::client", "Response from Razorpay", { "response": &value });

        if status == StatusCode::BAD_REQUEST {
            let error: ErrorResponse = serde_json::from_value(value)?;
            return Err(RazorpayError::GatewayError(error.error));
        }
        let order: RazorpayOrder = serde_json::from_value(value)?;
        Ok(order)
    }

    fn box_clone(&self) -> Box<dyn RazorpayGateway + Send + Sync> {
        Box::new(self.clone())
    }
}

/// In-memory stand-in for tests. Hands out sequential `order_test…` ids and
/// records every request so assertions can inspect what would have been sent.
#[derive(Clone)]
pub struct TestRazorpayClient {
    orders: Arc<Mutex<Vec<CreateOrderRequest>>>,
}

impl TestRazorpayClient {
    pub fn new() -> TestRazorpayClient {
        TestRazorpayClient {
            orders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<CreateOrderRequest> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl RazorpayGateway for TestRazorpayClient {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<RazorpayOrder, RazorpayError> {
        let mut orders = self.orders.lock().unwrap();
        let order = RazorpayOrder {
            id: format!("order_test{}", orders.len() + 1),
            amount: request.amount,
            amount_paid: 0,
            amount_due: request.amount,
            currency: request.currency.clone(),
            receipt: request.receipt.clone(),
            status: "created".to_string(),
            attempts: 0,
            created_at: 0,
        };
        orders.push(request);
        Ok(order)
    }

    fn box_clone(&self) -> Box<dyn RazorpayGateway + Send + Sync> {
        Box::new(self.clone())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub notes: HashMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub attempts: i64,
    #[serde(default)]
    pub created_at: i64,
}

/// Body of a webhook delivery. Only the payment payload is modelled; other
/// entities arrive with `payment: None` and are ignored upstream.
#[derive(Clone, Debug, Deserialize)]
pub struct WebhookEvent {
    pub entity: String,
    pub event: String,
    #[serde(default)]
    pub contains: Vec<String>,
    pub payload: WebhookPayload,
    pub created_at: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WebhookPayload {
    pub payment: Option<WebhookPayment>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WebhookPayment {
    pub entity: PaymentEntity,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub order_id: Option<String>,
    pub method: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct GatewayErrorDetail {
    pub code: String,
    pub description: String,
    pub field: Option<String>,
}

#[derive(Debug)]
pub enum RazorpayError {
    GatewayError(GatewayErrorDetail),
    HttpError(reqwest::Error),
    UnexpectedResponseError(String),
    DeserializationError(serde_json::Error),
}

impl fmt::Display for RazorpayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RazorpayError::GatewayError(detail) => {
                write!(f, "Razorpay rejected the request ({}): {}", detail.code, detail.description)
            }
            RazorpayError::HttpError(err) => write!(f, "Error communicating with Razorpay: {}", err),
            RazorpayError::UnexpectedResponseError(msg) => write!(f, "{}", msg),
            RazorpayError::DeserializationError(err) => {
                write!(f, "Could not deserialize Razorpay response: {}", err)
            }
        }
    }
}

impl StdError for RazorpayError {}

impl From<reqwest::Error> for RazorpayError {
    fn from(err: reqwest::Error) -> RazorpayError {
        RazorpayError::HttpError(err)
    }
}

impl From<serde_json::Error> for RazorpayError {
    fn from(err: serde_json::Error) -> RazorpayError {
        RazorpayError::DeserializationError(err)
    }
}

/// Checkout callback signature: HMAC-SHA256 over `"{order_id}|{payment_id}"`
/// keyed with the API key secret, hex encoded.
pub fn verify_payment_signature(order_id: &str, payment_id: &str, signature: &str, key_secret: &str) -> bool {
    verify_signature(
        format!("{}|{}", order_id, payment_id).as_bytes(),
        signature,
        key_secret,
    )
}

/// Webhook signature: HMAC-SHA256 over the raw request body keyed with the
/// webhook secret, delivered in the `X-Razorpay-Signature` header.
pub fn verify_webhook_signature(body: &[u8], signature: &str, webhook_secret: &str) -> bool {
    verify_signature(body, signature, webhook_secret)
}

fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> bool {
    let decoded = match hex::decode(signature.trim()) {
        Ok(decoded) => decoded,
        Err(_) => return false,
    };
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);
    // verify_slice is constant time
    mac.verify_slice(&decoded).is_ok()
}

/// Produces the signature the gateway would send for `payload`. The test
/// client and functional tests use this to fabricate valid callbacks.
pub fn sign_payload(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
