use actix_web::test;
use actix_web::web::Data;
use actix_web::HttpRequest;
use marquee_api::config::{Config, Environment};
use marquee_api::mail::transports::TestTransport;
use marquee_api::server::AppState;
use razorpay::TestRazorpayClient;

/// Request carrying a test `AppState`. The mail and gateway doubles are
/// swapped in before the state is built and the handles kept here, so a test
/// can read back what a handler sent.
pub struct TestRequest {
    pub request: HttpRequest,
    pub config: Config,
    pub mail_transport: TestTransport,
    pub razorpay_client: TestRazorpayClient,
}

impl TestRequest {
    pub fn create() -> TestRequest {
        TestRequest::build(None)
    }

    pub fn create_with_header(name: &'static str, value: &str) -> TestRequest {
        TestRequest::build(Some((name, value.to_string())))
    }

    fn build(header: Option<(&'static str, String)>) -> TestRequest {
        let mut config = Config::new(Environment::Test);
        let mail_transport = TestTransport::new();
        config.mail_transport = Box::new(mail_transport.clone());
        let razorpay_client = TestRazorpayClient::new();
        config.razorpay_client = Box::new(razorpay_client.clone());

        let mut request = test::TestRequest::default().app_data(Data::new(AppState::new(config.clone())));
        if let Some((name, value)) = header {
            request = request.insert_header((name, value));
        }

        TestRequest {
            request: request.to_http_request(),
            config,
            mail_transport,
            razorpay_client,
        }
    }
}
