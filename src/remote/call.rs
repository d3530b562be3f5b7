//! The retry loop shared by every remote operation.

use log::{debug, info, warn};
use std::time::Duration;

use super::endpoint::{Endpoint, EndpointConfig};
use super::operation::{Classified, RemoteOperation, Request};
use super::status::{Status, StatusSink};
use crate::error::{CallError, TransportError};
use crate::http::{RawResponse, RetryPolicy, Sleeper, Transport};

pub const CONFIGURATION_ERROR_TEXT: &str =
    "Error: Please set up the Google Apps Script URL as described in the instructions!";

const CONFIGURATION_ERROR_HIDE: Duration = Duration::from_secs(6);

/// Runs remote operations against one endpoint, retrying transient failures.
///
/// Holds no mutable state; every call to [`RemoteCall::perform_with_retry`]
/// starts a fresh attempt counter.
pub struct RemoteCall<T: Transport, S: Sleeper> {
    transport: T,
    sleeper: S,
    endpoint: EndpointConfig,
    policy: RetryPolicy,
}

impl<T: Transport, S: Sleeper> RemoteCall<T, S> {
    pub fn new(transport: T, sleeper: S, endpoint: EndpointConfig, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            endpoint,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Performs one logical operation.
    ///
    /// The endpoint is validated first; an invalid endpoint fails without any
    /// request. A 2xx response is handed to the operation's classifier, which
    /// decides whether its body is worth another attempt. Any other status or
    /// a network error is retried after `2^attempt * base_delay` until the
    /// attempt budget is spent. Exactly one
    /// terminal status is reported to `sink`.
    #[tracing::instrument(skip(self, operation, sink), fields(op = %operation.describe()))]
    pub async fn perform_with_retry<O: RemoteOperation>(
        &self,
        operation: &O,
        sink: &dyn StatusSink,
    ) -> Result<O::Output, CallError> {
        let endpoint = match self.endpoint.validate() {
            Ok(endpoint) => endpoint,
            Err(e) => {
                warn!("{}: endpoint rejected: {}", operation.describe(), e);
                sink.show(Status::error(CONFIGURATION_ERROR_TEXT, CONFIGURATION_ERROR_HIDE));
                return Err(CallError::Configuration(e));
            }
        };

        let request = operation.request();
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 1;

        loop {
            let loading = operation.loading_status();
            if attempt == 1 {
                sink.show(loading);
            } else {
                sink.show(Status::loading(format!(
                    "{} (retry {}/{})",
                    loading.text, attempt, max_attempts
                )));
            }

            debug!(
                "{}: attempt {}/{} against {}",
                operation.describe(),
                attempt,
                max_attempts,
                endpoint
            );

            let outcome = match self.send(&endpoint, &request).await {
                Ok(response) if response.is_success() => operation.classify(&response.body),
                Ok(response) => Classified::Retryable(TransportError::Status(response.status)),
                Err(e) => Classified::Retryable(e),
            };

            match outcome {
                Classified::Success(output) => {
                    info!("{}: succeeded on attempt {}", operation.describe(), attempt);
                    sink.show(operation.success_status(&output));
                    return Ok(output);
                }
                Classified::Logical(message) => {
                    info!("{}: rejected by endpoint: {}", operation.describe(), message);
                    sink.show(operation.logical_failure_status(&message));
                    return Err(CallError::Logical(message));
                }
                Classified::Retryable(error) => {
                    if !self.policy.should_retry(attempt) {
                        warn!(
                            "{}: failed after {} attempts: {}",
                            operation.describe(),
                            attempt,
                            error
                        );
                        sink.show(operation.terminal_failure_status());
                        return Err(CallError::Terminal {
                            attempts: attempt,
                            last: error,
                        });
                    }

                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                        operation.describe(),
                        attempt,
                        max_attempts,
                        error,
                        delay.as_millis()
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn send(
        &self,
        endpoint: &Endpoint,
        request: &Request,
    ) -> Result<RawResponse, TransportError> {
        match request {
            Request::Form(fields) => self.transport.post_form(endpoint.as_str(), fields).await,
            Request::Query(params) => self.transport.get_with_query(endpoint.as_str(), params).await,
        }
    }
}
