use std::sync::Arc;

use http::{Method, header};
use secrecy::SecretString;
use url::Url;

use crate::body::Body;
use crate::error::ClientError;
use crate::function::{DeployRequest, FunctionDescriptor, FunctionRecord, RemoveRequest};
use crate::options::{Credentials, RequestOptions, ResolvedOptions};
use crate::request::{GatewayRequest, GatewayRequestBuilder};
use crate::response::{BodyMode, InvocationResult, ResponseBody};
use crate::transport::{HttpTransport, ReqwestTransport};

const FUNCTION_SEGMENT: &str = "function";
const SYSTEM_FUNCTIONS_SEGMENTS: [&str; 2] = ["system", "functions"];

/// Configuration for [`GatewayClient`]
#[derive(Debug, Default)]
pub struct GatewayConfig {
    /// Base URL of the gateway, e.g. `http://localhost:8080`
    pub gateway: String,
    pub user: Option<String>,
    pub pass: Option<SecretString>,
    /// Defaults applied to every request, overridable per call
    pub defaults: RequestOptions,
}

impl GatewayConfig {
    /// Configuration for `gateway` with no credentials or defaults.
    #[must_use]
    pub fn new(gateway: impl Into<String>) -> Self {
        Self {
            gateway: gateway.into(),
            ..Self::default()
        }
    }

    /// Basic-auth credentials; these win over any in the defaults.
    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.pass = Some(SecretString::from(pass.into()));
        self
    }

    /// Replace the client-level request defaults.
    #[must_use]
    pub fn with_defaults(mut self, defaults: RequestOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Create configuration from environment variables
    ///
    /// Expects:
    /// - `FAAS_GATEWAY`: Base URL of the gateway (required)
    /// - `FAAS_USER` / `FAAS_PASS`: Basic-auth credentials (optional, both or neither)
    ///
    /// # Errors
    /// Returns `ClientError::Configuration` if `FAAS_GATEWAY` is not set.
    pub fn from_env() -> Result<Self, ClientError> {
        let gateway = std::env::var("FAAS_GATEWAY")
            .map_err(|_| ClientError::Configuration("FAAS_GATEWAY not set".into()))?;

        Ok(Self {
            gateway,
            user: std::env::var("FAAS_USER").ok(),
            pass: std::env::var("FAAS_PASS").ok().map(SecretString::from),
            defaults: RequestOptions::default(),
        })
    }
}

/// Client for the gateway's function and system endpoints.
///
/// Holds only immutable configuration and a shared transport, so clones are
/// cheap and concurrent calls never interact.
#[derive(Clone)]
pub struct GatewayClient {
    gateway: Url,
    defaults: Arc<RequestOptions>,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("gateway", &self.gateway.as_str())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Create a client for `address` with no credentials or defaults.
    ///
    /// # Errors
    /// Returns `ClientError::Configuration` if the address is empty or malformed.
    pub fn from_address(address: impl Into<String>) -> Result<Self, ClientError> {
        Self::from_config(GatewayConfig::new(address))
    }

    /// Create client from configuration using the reqwest transport.
    ///
    /// # Errors
    /// Returns `ClientError::Configuration` for a missing or malformed gateway,
    /// or when only one of `user`/`pass` is set.
    pub fn from_config(config: GatewayConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(None)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create client from configuration with a custom transport.
    ///
    /// # Errors
    /// Same as [`GatewayClient::from_config`].
    pub fn with_transport(
        config: GatewayConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ClientError> {
        let gateway = parse_gateway(&config.gateway)?;

        let mut defaults = config.defaults;
        match (config.user, config.pass) {
            (Some(user), Some(pass)) => {
                defaults.credentials = Some(Credentials::from_secret(user, pass));
            }
            (None, None) => {}
            (Some(_), None) => {
                return Err(ClientError::Configuration(
                    "user is set but pass is missing".into(),
                ));
            }
            (None, Some(_)) => {
                return Err(ClientError::Configuration(
                    "pass is set but user is missing".into(),
                ));
            }
        }

        Ok(Self {
            gateway,
            defaults: Arc::new(defaults),
            transport,
        })
    }

    /// Base URL of the gateway
    #[must_use]
    pub fn gateway(&self) -> &Url {
        &self.gateway
    }

    /// Client-level request defaults
    #[must_use]
    pub fn defaults(&self) -> &RequestOptions {
        &self.defaults
    }

    /// `{gateway}/function/{name}`
    #[must_use]
    pub fn function_path(&self, function_name: &str) -> Url {
        join_segments(&self.gateway, &[FUNCTION_SEGMENT, function_name])
    }

    /// `{gateway}/system/functions`
    #[must_use]
    pub fn system_functions_path(&self) -> Url {
        join_segments(&self.gateway, &SYSTEM_FUNCTIONS_SEGMENTS)
    }

    /// POST `data` to a function and return its response.
    ///
    /// The status code is not inspected; a non-2xx answer is still `Ok`.
    ///
    /// # Errors
    /// Returns a transport error if no response was received, or
    /// `ClientError::Serialization` if a JSON response could not be parsed.
    pub async fn invoke(
        &self,
        function_name: &str,
        data: impl Into<Body>,
        options: &RequestOptions,
    ) -> Result<InvocationResult, ClientError> {
        let resolved = self.defaults.resolve(options);
        let mut builder = self
            .request(Method::POST, self.function_path(function_name), &resolved)?
            .body(data);
        if resolved.json {
            builder = builder.headers(json_content_type());
        }
        self.execute(builder.build(), resolved.body_mode()).await
    }

    /// Deploy a function from an image.
    ///
    /// # Errors
    /// Returns a transport or serialization error.
    pub async fn deploy(
        &self,
        descriptor: &FunctionDescriptor,
        options: &RequestOptions,
    ) -> Result<InvocationResult, ClientError> {
        let resolved = self.defaults.resolve(options);
        let body = DeployRequest {
            service: &descriptor.name,
            network: descriptor.network.as_deref().unwrap_or(resolved.network),
            image: &descriptor.image,
        };
        let request = self
            .request(Method::POST, self.system_functions_path(), &resolved)?
            .json(&body)?
            .build();
        self.execute(request, BodyMode::Json).await
    }

    /// List deployed functions; the body is the gateway's JSON array.
    ///
    /// # Errors
    /// Returns a transport error, or `ClientError::Serialization` if a 2xx
    /// listing is not valid JSON.
    pub async fn list(&self, options: &RequestOptions) -> Result<InvocationResult, ClientError> {
        let resolved = self.defaults.resolve(options);
        let request = self
            .request(Method::GET, self.system_functions_path(), &resolved)?
            .build();
        self.execute(request, BodyMode::Json).await
    }

    /// Typed variant of [`GatewayClient::list`].
    ///
    /// # Errors
    /// Also fails with `ClientError::Serialization` if the body is not a
    /// list of function records.
    pub async fn list_functions(
        &self,
        options: &RequestOptions,
    ) -> Result<Vec<FunctionRecord>, ClientError> {
        self.list(options).await?.json()
    }

    /// Remove a deployed function.
    ///
    /// # Errors
    /// Returns a transport or serialization error.
    pub async fn remove(
        &self,
        function_name: &str,
        options: &RequestOptions,
    ) -> Result<InvocationResult, ClientError> {
        let resolved = self.defaults.resolve(options);
        let request = self
            .request(Method::DELETE, self.system_functions_path(), &resolved)?
            .json(&RemoveRequest { function_name })?
            .build();
        self.execute(request, BodyMode::Json).await
    }

    /// Find a function by name in the gateway listing.
    ///
    /// Absence is `Ok(None)`, not an error. A listing answered with a
    /// non-2xx status (e.g. `401` for missing credentials) also yields
    /// `Ok(None)`, since no record can be read from it.
    ///
    /// # Errors
    /// Returns a transport error, or `ClientError::Serialization` if a 2xx
    /// listing cannot be decoded.
    pub async fn inspect(&self, function_name: &str) -> Result<Option<FunctionRecord>, ClientError> {
        let listing = self.list(&RequestOptions::default()).await?;
        if !listing.is_success() {
            tracing::debug!(
                function = function_name,
                status = %listing.status(),
                "Function listing not available"
            );
            return Ok(None);
        }
        let functions: Vec<FunctionRecord> = listing.json()?;
        Ok(functions.into_iter().find(|f| f.name == function_name))
    }

    fn request(
        &self,
        method: Method,
        url: Url,
        resolved: &ResolvedOptions<'_>,
    ) -> Result<GatewayRequestBuilder, ClientError> {
        let mut headers = resolved.headers.clone();
        if let Some(credentials) = resolved.credentials {
            headers.insert(header::AUTHORIZATION, credentials.header_value()?);
        }
        Ok(GatewayRequest::builder(method, url)
            .headers(headers)
            .timeout(resolved.timeout))
    }

    async fn execute(
        &self,
        request: GatewayRequest,
        mode: BodyMode,
    ) -> Result<InvocationResult, ClientError> {
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "Sending gateway request");

        let raw = self.transport.send(request).await?;
        tracing::debug!(%method, %url, status = %raw.status, "Gateway responded");

        let body = ResponseBody::decode(raw.status, raw.body, mode)?;
        Ok(InvocationResult::new(raw.status, raw.headers, body))
    }
}

fn json_content_type() -> http::HeaderMap {
    let mut headers = http::HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    headers
}

/// Parse and normalize the gateway address: absolute http(s) URL with
/// duplicate and trailing path separators collapsed.
fn parse_gateway(address: &str) -> Result<Url, ClientError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ClientError::Configuration("gateway address is required".into()));
    }

    let mut url = Url::parse(address)
        .map_err(|e| ClientError::Configuration(format!("Invalid gateway address '{address}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ClientError::Configuration(format!(
            "Gateway address must be an http(s) URL: '{address}'"
        )));
    }

    let path = url
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    url.set_path(&format!("/{path}"));
    Ok(url)
}

fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // parse_gateway rejects cannot-be-a-base URLs, so segments are always available
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
