use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use std::time::Duration;

use crate::body::Body;
use crate::error::ClientError;
use crate::request::GatewayRequest;

/// Buffered response as received from the wire.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// HTTP client adapter the gateway client issues its requests through.
///
/// Implementations must not interpret status codes: any response that was
/// received is `Ok`, only failures to obtain one are errors.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and buffer the full response.
    ///
    /// # Errors
    /// Returns a transport error when no response could be obtained.
    async fn send(&self, request: GatewayRequest) -> Result<RawResponse, ClientError>;
}

/// [`HttpTransport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with an optional overall request timeout.
    ///
    /// # Errors
    /// Returns `ClientError::Configuration` if the underlying client cannot be built.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self { http_client })
    }
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout(e.to_string())
    } else if e.is_connect() {
        ClientError::Connection(e.to_string())
    } else {
        ClientError::Transport(e)
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: GatewayRequest) -> Result<RawResponse, ClientError> {
        let mut req_builder = self
            .http_client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());

        if let Some(timeout) = request.timeout() {
            req_builder = req_builder.timeout(timeout);
        }

        req_builder = match request.into_body() {
            Body::Empty => req_builder,
            Body::Bytes(bytes) => req_builder.body(bytes),
        };

        let resp = req_builder.send().await.map_err(map_send_error)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(map_send_error)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
