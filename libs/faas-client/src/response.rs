use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::body::Body;
use crate::error::ClientError;

/// How a response payload is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// UTF-8 text, invalid sequences replaced
    #[default]
    Text,
    /// Raw bytes, untouched
    Binary,
    /// Parsed JSON
    Json,
}

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseBody {
    #[default]
    Empty,
    Text(String),
    Binary(Bytes),
    Json(serde_json::Value),
}

impl ResponseBody {
    /// Decode raw response bytes according to `mode`.
    ///
    /// A JSON payload that fails to parse is only an error on a success
    /// status; error responses keep their text so the caller can see it.
    ///
    /// # Errors
    /// Returns `ClientError::Serialization` for malformed JSON on a 2xx response.
    pub fn decode(status: StatusCode, bytes: Bytes, mode: BodyMode) -> Result<Self, ClientError> {
        if bytes.is_empty() && mode != BodyMode::Text {
            return Ok(ResponseBody::Empty);
        }
        match mode {
            BodyMode::Text => Ok(ResponseBody::Text(
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
            BodyMode::Binary => Ok(ResponseBody::Binary(bytes)),
            BodyMode::Json => match serde_json::from_slice(&bytes) {
                Ok(value) => Ok(ResponseBody::Json(value)),
                Err(_) if !status.is_success() => Ok(ResponseBody::Text(
                    String::from_utf8_lossy(&bytes).into_owned(),
                )),
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Text content, if the body was decoded as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Raw bytes, if the body was kept binary.
    #[must_use]
    pub fn as_binary(&self) -> Option<&Bytes> {
        match self {
            ResponseBody::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Parsed JSON, if the body was decoded as JSON.
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Re-encodes a response payload so it can be sent as the next request.
impl From<ResponseBody> for Body {
    fn from(body: ResponseBody) -> Self {
        match body {
            ResponseBody::Empty => Body::Empty,
            ResponseBody::Text(text) => Body::from(text),
            ResponseBody::Binary(bytes) => Body::Bytes(bytes),
            ResponseBody::Json(value) => Body::from(value.to_string()),
        }
    }
}

/// Uniform result of every gateway operation.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

impl InvocationResult {
    /// Create a result from its components
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: ResponseBody) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Wrap a payload that never went over the wire.
    ///
    /// Used by an empty composition: status is `200 OK` and there are no
    /// headers. A payload that is not JSON in JSON mode is kept as text.
    #[must_use]
    pub fn passthrough(body: Body, mode: BodyMode) -> Self {
        let body = match body {
            Body::Empty => ResponseBody::Empty,
            Body::Bytes(bytes) => match mode {
                BodyMode::Binary => ResponseBody::Binary(bytes),
                BodyMode::Json => serde_json::from_slice(&bytes).map_or_else(
                    |_| ResponseBody::Text(String::from_utf8_lossy(&bytes).into_owned()),
                    ResponseBody::Json,
                ),
                BodyMode::Text => ResponseBody::Text(String::from_utf8_lossy(&bytes).into_owned()),
            },
        };
        Self::new(StatusCode::OK, HeaderMap::new(), body)
    }

    /// Get the HTTP status code
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the gateway answered with a 2xx status
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get the response headers
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the decoded body
    #[must_use]
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Take the decoded body
    #[must_use]
    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    /// Deserialize the body into `T`, whatever mode it was decoded with.
    ///
    /// # Errors
    /// Returns `ClientError::Serialization` if the body is empty or does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let value = match &self.body {
            ResponseBody::Empty => {
                return Err(ClientError::Serialization("response body is empty".into()));
            }
            ResponseBody::Json(value) => T::deserialize(value)?,
            ResponseBody::Text(text) => serde_json::from_str(text)?,
            ResponseBody::Binary(bytes) => serde_json::from_slice(bytes)?,
        };
        Ok(value)
    }
}
