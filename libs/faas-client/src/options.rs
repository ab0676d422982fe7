use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::ClientError;
use crate::response::BodyMode;

/// Network functions are attached to when a deploy does not name one.
pub const DEFAULT_NETWORK: &str = "func_functions";

/// Basic-auth credential pair.
#[derive(Debug)]
pub struct Credentials {
    user: String,
    pass: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: SecretString::from(pass.into()),
        }
    }

    pub(crate) fn from_secret(user: String, pass: SecretString) -> Self {
        Self { user, pass }
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// `Authorization` header value for these credentials, marked sensitive.
    ///
    /// # Errors
    /// Returns `ClientError::Configuration` if the encoded value is not a valid header.
    pub fn header_value(&self) -> Result<HeaderValue, ClientError> {
        let token = STANDARD.encode(format!("{}:{}", self.user, self.pass.expose_secret()));
        let mut value = HeaderValue::from_str(&format!("Basic {token}"))
            .map_err(|e| ClientError::Configuration(format!("Invalid credentials: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Options applied to outgoing requests.
///
/// Held once by the client as defaults and optionally passed per call; unset
/// fields fall through to the next layer.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub credentials: Option<Credentials>,
    pub network: Option<String>,
    pub json: Option<bool>,
    pub binary_response: Option<bool>,
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Send the payload as JSON and parse the response as JSON.
    #[must_use]
    pub fn json(mut self, json: bool) -> Self {
        self.json = Some(json);
        self
    }

    /// Return the response payload as raw bytes instead of text.
    #[must_use]
    pub fn binary_response(mut self, binary: bool) -> Self {
        self.binary_response = Some(binary);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header sent with every request using these options.
    ///
    /// # Errors
    /// Returns `ClientError::Configuration` if the name or value is invalid.
    pub fn header<K, V>(mut self, key: K, value: V) -> Result<Self, ClientError>
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: std::fmt::Display,
        V::Error: std::fmt::Display,
    {
        let key = key
            .try_into()
            .map_err(|e| ClientError::Configuration(format!("Invalid header name: {e}")))?;
        let value = value
            .try_into()
            .map_err(|e| ClientError::Configuration(format!("Invalid header value: {e}")))?;
        self.headers.insert(key, value);
        Ok(self)
    }

    /// Layer `call` over `self` over the built-in defaults.
    #[must_use]
    pub fn resolve<'a>(&'a self, call: &'a RequestOptions) -> ResolvedOptions<'a> {
        let mut headers = self.headers.clone();
        headers.extend(call.headers.clone());

        ResolvedOptions {
            credentials: call.credentials.as_ref().or(self.credentials.as_ref()),
            network: call
                .network
                .as_deref()
                .or(self.network.as_deref())
                .unwrap_or(DEFAULT_NETWORK),
            json: call.json.or(self.json).unwrap_or(false),
            binary_response: call
                .binary_response
                .or(self.binary_response)
                .unwrap_or(false),
            headers,
            timeout: call.timeout.or(self.timeout),
        }
    }
}

/// Fully resolved options for a single request.
#[derive(Debug)]
pub struct ResolvedOptions<'a> {
    pub credentials: Option<&'a Credentials>,
    pub network: &'a str,
    pub json: bool,
    pub binary_response: bool,
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
}

impl ResolvedOptions<'_> {
    /// How the invoke response should be decoded; binary wins over JSON.
    #[must_use]
    pub fn body_mode(&self) -> BodyMode {
        if self.binary_response {
            BodyMode::Binary
        } else if self.json {
            BodyMode::Json
        } else {
            BodyMode::Text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let client = RequestOptions::new();
        let call = RequestOptions::new();
        let resolved = client.resolve(&call);
        assert_eq!(resolved.network, DEFAULT_NETWORK);
        assert!(!resolved.json);
        assert!(resolved.credentials.is_none());
        assert_eq!(resolved.body_mode(), BodyMode::Text);
    }

    #[test]
    fn call_options_override_client_options() {
        let client = RequestOptions::new()
            .with_network("client_net")
            .json(true)
            .with_credentials(Credentials::new("client", "secret"))
            .header("x-tier", "client")
            .unwrap()
            .header("x-client-only", "1")
            .unwrap();
        let call = RequestOptions::new()
            .with_network("call_net")
            .binary_response(true)
            .with_credentials(Credentials::new("call", "secret"))
            .header("x-tier", "call")
            .unwrap();

        let resolved = client.resolve(&call);
        assert_eq!(resolved.network, "call_net");
        assert_eq!(resolved.credentials.map(Credentials::user), Some("call"));
        assert_eq!(resolved.headers["x-tier"], "call");
        assert_eq!(resolved.headers["x-client-only"], "1");
        assert_eq!(resolved.body_mode(), BodyMode::Binary);
    }

    #[test]
    fn client_options_fill_unset_call_fields() {
        let client = RequestOptions::new()
            .with_network("client_net")
            .with_timeout(Duration::from_secs(5));
        let call = RequestOptions::new().json(true);
        let resolved = client.resolve(&call);
        assert_eq!(resolved.network, "client_net");
        assert_eq!(resolved.timeout, Some(Duration::from_secs(5)));
        assert_eq!(resolved.body_mode(), BodyMode::Json);
    }

    #[test]
    fn basic_auth_header() {
        let value = Credentials::new("user", "pass").header_value().unwrap();
        assert_eq!(value, "Basic dXNlcjpwYXNz");
        assert!(value.is_sensitive());
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("user", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
