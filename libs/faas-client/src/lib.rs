//! Function-as-a-service gateway client
//!
//! Thin request builder over an HTTP transport for a gateway that deploys,
//! lists, removes and invokes functions, plus sequential composition of
//! function invocations.
//!
//! Gateway responses are never turned into errors because of their status
//! code: callers inspect [`InvocationResult::status`] themselves. Only
//! configuration, transport, serialization and cancellation failures are
//! reported as [`ClientError`].
//!
//! # Examples
//!
//! ```no_run
//! use faas_client::{FunctionDescriptor, GatewayClient, GatewayConfig, RequestOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GatewayClient::from_config(
//!     GatewayConfig::new("http://localhost:8080").with_credentials("admin", "secret"),
//! )?;
//!
//! client
//!     .deploy(&FunctionDescriptor::new("nodeinfo", "functions/nodeinfo"), &RequestOptions::default())
//!     .await?;
//!
//! let response = client.invoke("nodeinfo", "verbose", &RequestOptions::default()).await?;
//! println!("{}: {:?}", response.status(), response.body());
//!
//! let composed = client
//!     .compose_with_input("hello", ["uppercase", "reverse"])
//!     .await?;
//! println!("{:?}", composed.body().as_text());
//! # Ok(())
//! # }
//! ```

mod body;
mod client;
mod compose;
mod error;
mod function;
mod options;
mod request;
mod response;
mod transport;

// Re-export public API
pub use body::Body;
pub use client::{GatewayClient, GatewayConfig};
pub use error::ClientError;
pub use function::{FunctionDescriptor, FunctionRecord};
pub use options::{Credentials, DEFAULT_NETWORK, RequestOptions, ResolvedOptions};
pub use request::{GatewayRequest, GatewayRequestBuilder};
pub use response::{BodyMode, InvocationResult, ResponseBody};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};

// Re-export commonly used types from dependencies
pub use http::{Method, StatusCode};
pub use tokio_util::sync::CancellationToken;
