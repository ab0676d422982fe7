use thiserror::Error;

/// Errors produced by gateway client operations.
///
/// Non-2xx gateway responses are not represented here: they come back as a
/// regular [`InvocationResult`](crate::InvocationResult) carrying the status.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or malformed client configuration, raised before any I/O.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A composition was cancelled before or while invoking `function`.
    #[error("Composition cancelled at function '{function}'")]
    Cancelled { function: String },
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl ClientError {
    /// Whether the error came from the HTTP transport rather than from
    /// configuration, serialization or cancellation.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Connection(_) | ClientError::Timeout(_) | ClientError::Transport(_)
        )
    }
}
