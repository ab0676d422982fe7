use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::body::Body;
use crate::error::ClientError;

/// Fully built request handed to an [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Body,
    timeout: Option<Duration>,
}

impl GatewayRequest {
    /// Create a new request builder
    #[must_use]
    pub fn builder(method: Method, url: Url) -> GatewayRequestBuilder {
        GatewayRequestBuilder {
            method,
            url,
            headers: HeaderMap::new(),
            body: Body::Empty,
            timeout: None,
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[must_use]
    pub fn into_body(self) -> Body {
        self.body
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Builder for [`GatewayRequest`]
#[derive(Debug)]
pub struct GatewayRequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Body,
    timeout: Option<Duration>,
}

impl GatewayRequestBuilder {
    /// Merge headers, replacing existing values for the same names
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the body to a JSON-serialized value and add Content-Type header
    ///
    /// # Errors
    /// Returns `ClientError::Serialization` if `value` cannot be encoded.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, ClientError> {
        self.body = Body::from_json(value)?;
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(self)
    }

    /// Set the request body
    #[must_use]
    pub fn body<B: Into<Body>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn build(self) -> GatewayRequest {
        GatewayRequest {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url() -> Url {
        Url::parse("http://localhost:8080/system/functions").unwrap()
    }

    #[test]
    fn json_sets_content_type() {
        let request = GatewayRequest::builder(Method::POST, url())
            .json(&json!({"functionName": "f"}))
            .unwrap()
            .build();
        assert_eq!(request.headers()[http::header::CONTENT_TYPE], "application/json");
        assert_eq!(request.body().as_bytes(), br#"{"functionName":"f"}"#);
    }

    #[test]
    fn defaults_to_empty_body() {
        let request = GatewayRequest::builder(Method::GET, url()).build();
        assert!(request.body().is_empty());
        assert!(request.timeout().is_none());
    }
}
