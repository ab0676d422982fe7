//! Sequential function composition.
//!
//! Each function receives the previous function's response body as its
//! request payload. At most one invocation is in flight, and the first
//! failure ends the chain.

use tokio_util::sync::CancellationToken;

use crate::body::Body;
use crate::client::GatewayClient;
use crate::error::ClientError;
use crate::options::RequestOptions;
use crate::response::InvocationResult;

impl GatewayClient {
    /// Compose `functions` starting without any payload.
    ///
    /// # Errors
    /// See [`GatewayClient::compose_with`].
    pub async fn compose<I, S>(&self, functions: I) -> Result<InvocationResult, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.compose_with(
            None,
            functions,
            &RequestOptions::default(),
            &CancellationToken::new(),
        )
        .await
    }

    /// Compose `functions` starting from `data`.
    ///
    /// # Errors
    /// See [`GatewayClient::compose_with`].
    pub async fn compose_with_input<I, S>(
        &self,
        data: impl Into<Body>,
        functions: I,
    ) -> Result<InvocationResult, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.compose_with(
            Some(data.into()),
            functions,
            &RequestOptions::default(),
            &CancellationToken::new(),
        )
        .await
    }

    /// Invoke `functions` left to right, piping each response body into the
    /// next request.
    ///
    /// With no functions the initial payload is returned as a `200 OK`
    /// result decoded like a response would be, and nothing is sent; this
    /// case never fails.
    /// `options` apply to every step. `cancel` is checked before each step
    /// and raced against the step in flight; steps already completed are
    /// not undone.
    ///
    /// # Errors
    /// Returns the first step's error unchanged, or `ClientError::Cancelled`
    /// naming the step that was aborted. Non-2xx responses are not errors.
    pub async fn compose_with<I, S>(
        &self,
        input: Option<Body>,
        functions: I,
        options: &RequestOptions,
        cancel: &CancellationToken,
    ) -> Result<InvocationResult, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut payload = input.unwrap_or_default();
        let mut last: Option<InvocationResult> = None;

        for (step, function) in functions.into_iter().enumerate() {
            let function = function.as_ref();
            if let Some(previous) = last.take() {
                payload = previous.into_body().into();
            }

            if cancel.is_cancelled() {
                tracing::warn!(step, function, "Composition cancelled before step");
                return Err(ClientError::Cancelled {
                    function: function.to_owned(),
                });
            }

            tracing::debug!(step, function, "Invoking composed function");
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::warn!(step, function, "Composition cancelled during step");
                    return Err(ClientError::Cancelled { function: function.to_owned() });
                }
                result = self.invoke(function, std::mem::take(&mut payload), options) => result,
            };

            match result {
                Ok(result) => last = Some(result),
                Err(e) => {
                    tracing::debug!(step, function, error = %e, "Composed function failed");
                    return Err(e);
                }
            }
        }

        match last {
            Some(result) => Ok(result),
            None => {
                let mode = self.defaults().resolve(options).body_mode();
                Ok(InvocationResult::passthrough(payload, mode))
            }
        }
    }
}
