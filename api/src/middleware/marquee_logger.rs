use crate::extractors::AccessTokenExtractor;
use actix_web::body::MessageBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{header, StatusCode};
use actix_web::error;
use futures::future::{ok, LocalBoxFuture, Ready};
use log::Level;
use std::rc::Rc;

pub struct MarqueeLogger;

impl MarqueeLogger {
    pub fn new() -> Self {
        Self {}
    }

    // log message at the start of request lifecycle
    pub fn start(sreq: &ServiceRequest) -> RequestLogData {
        let data = RequestLogData::from(sreq);
        if data.uri != "/status" {
            jlog!(
                Level::Info,
                "api::request_logger",
                format!("{} {} starting", data.method, data.uri).as_str(),
                {
                    "user_id": data.user,
                    "ip_address": data.ip_address,
                    "uri": data.uri,
                    "method": data.method,
                    "user_agent": data.user_agent,
                    "api_version": env!("CARGO_PKG_VERSION")
            });
        };
        data
    }

    // log message at the end of request lifecycle
    pub fn finish<B>(
        data: &RequestLogData,
        resp: error::Result<ServiceResponse<B>>,
    ) -> error::Result<ServiceResponse<B>> {
        let error = match resp {
            Err(ref error) => Some(error),
            Ok(ref resp) => resp.response().error(),
        };
        if let Some(error) = error {
            let level = match error.as_response_error().status_code() {
                StatusCode::UNAUTHORIZED => Level::Info,
                s if s.is_client_error() => Level::Warn,
                _ => Level::Error,
            };
            jlog!(
                level,
                "api::request_logger",
                &error.to_string(),
                {
                    "user_id": data.user,
                    "ip_address": data.ip_address,
                    "uri": data.uri,
                    "method": data.method,
                    "api_version": env!("CARGO_PKG_VERSION"),
                    "user_agent": data.user_agent
            });
        };
        resp
    }
}

pub struct RequestLogData {
    user: Option<uuid::Uuid>,
    ip_address: Option<String>,
    method: String,
    user_agent: Option<String>,
    uri: String,
}

impl RequestLogData {
    fn from(req: &ServiceRequest) -> Self {
        let uri = req.uri().to_string();
        let user = AccessTokenExtractor::from_request(req)
            .ok()
            .map(|token| token.get_id().ok())
            .flatten();
        let ip_address = req.connection_info().realip_remote_addr().map(|i| i.to_string());
        let method = req.method().to_string();
        let user_agent = if let Some(ua) = req.headers().get(header::USER_AGENT) {
            let s = ua.to_str().unwrap_or("");
            Some(s.to_string())
        } else {
            None
        };
        Self {
            user,
            ip_address,
            method,
            user_agent,
            uri,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MarqueeLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = error::Error> + 'static,
    B: MessageBody,
{
    type Response = S::Response;
    type Error = S::Error;
    type InitError = ();
    type Transform = LoggerService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(LoggerService::new(service))
    }
}

pub struct LoggerService<S> {
    service: Rc<S>,
}

impl<S> LoggerService<S> {
    fn new(service: S) -> Self {
        Self {
            service: Rc::new(service),
        }
    }
}

impl<S, B> Service<ServiceRequest> for LoggerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = error::Error> + 'static,
    B: MessageBody,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, request: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        Box::pin(async move {
            let data = MarqueeLogger::start(&request);
            let response = service.call(request).await;
            MarqueeLogger::finish(&data, response)
        })
    }
}
