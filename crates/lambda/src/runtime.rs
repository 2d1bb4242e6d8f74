//! The invocation loop.
//!
//! A two-state machine: poll the control plane for work, process the
//! invocation to completion, poll again. Transport-level failures are the
//! only retried kind; they back off by the configured pause and count
//! against `max_attempts`. A business-logic failure is terminal for its
//! invocation, reported once on the error channel, and never retried.

use std::env;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::adapter::EventAdapter;
use crate::client::{Invocation, RuntimeApi};
use crate::context::ExecutionContext;
use crate::error::LambdaError;
use crate::event::{ErrorEnvelope, InvocationEvent, ResponseEnvelope};

const RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";
const DEFAULT_POLL_BACKOFF: Duration = Duration::from_secs(1);

/// Retry policy and control-plane location, read once at startup.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Control endpoint in `host[:port]` form.
    pub endpoint: String,
    /// Pause between attempts after a transport-level failure.
    pub poll_backoff: Duration,
    /// Consecutive transport failures tolerated before giving up.
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RuntimeConfig {
    /// Reads the configuration from the environment.
    ///
    /// An unset `AWS_LAMBDA_RUNTIME_API` means the process is not running
    /// under a control plane at all, which is fatal.
    pub fn from_env() -> Result<Self, LambdaError> {
        let endpoint = env::var(RUNTIME_API_ENV).map_err(|_| LambdaError::missing_env(RUNTIME_API_ENV))?;
        Ok(Self { endpoint, poll_backoff: DEFAULT_POLL_BACKOFF, max_attempts: None })
    }
}

enum State {
    Polling,
    Processing(Invocation),
}

pub struct InvocationLoop<A> {
    api: A,
    adapter: EventAdapter,
    poll_backoff: Duration,
    max_attempts: Option<u32>,
}

impl<A: RuntimeApi> InvocationLoop<A> {
    pub fn new(api: A, adapter: EventAdapter, config: &RuntimeConfig) -> Self {
        Self { api, adapter, poll_backoff: config.poll_backoff, max_attempts: config.max_attempts }
    }

    /// Runs until the process is shut down, or until consecutive transport
    /// failures exhaust the configured attempt budget.
    pub async fn run(&self) -> Result<(), LambdaError> {
        let mut state = State::Polling;
        let mut failed_attempts: u32 = 0;

        loop {
            state = match state {
                State::Polling => match self.api.next_invocation().await {
                    Ok(invocation) => {
                        failed_attempts = 0;
                        State::Processing(invocation)
                    }
                    Err(e) => {
                        failed_attempts += 1;
                        self.back_off(&e, failed_attempts).await?;
                        State::Polling
                    }
                },
                State::Processing(invocation) => {
                    // An accepted invocation always runs to completion.
                    match self.process(invocation).await {
                        Ok(()) => failed_attempts = 0,
                        Err(e) => {
                            failed_attempts += 1;
                            self.back_off(&e, failed_attempts).await?;
                        }
                    }
                    State::Polling
                }
            };
        }
    }

    /// Processes one invocation: parse, adapt, report.
    ///
    /// The returned `Err` only ever carries a reporting (transport) failure;
    /// invocation-level failures are consumed here by posting an error
    /// envelope.
    async fn process(&self, invocation: Invocation) -> Result<(), LambdaError> {
        let ctx = ExecutionContext::from_env(invocation.request_id.as_str());

        match self.handle(&invocation, &ctx).await {
            Ok(envelope) => {
                info!(request_id = %invocation.request_id, status = envelope.status_code, "invocation succeeded");
                self.api.send_response(&invocation.request_id, &envelope).await
            }
            Err(e) => {
                error!(cause = %e, request_id = %invocation.request_id, "invocation failed");
                self.api.send_error(&invocation.request_id, &ErrorEnvelope::from_error(&e)).await
            }
        }
    }

    async fn handle(&self, invocation: &Invocation, ctx: &ExecutionContext) -> Result<ResponseEnvelope, LambdaError> {
        let payload: serde_json::Value = serde_json::from_slice(&invocation.payload)?;
        let event = InvocationEvent::from_value(payload)?;
        self.adapter.adapt(event, ctx).await
    }

    async fn back_off(&self, cause: &LambdaError, failed_attempts: u32) -> Result<(), LambdaError> {
        if self.max_attempts.is_some_and(|max| failed_attempts >= max) {
            return Err(LambdaError::AttemptsExhausted { attempts: failed_attempts });
        }
        warn!(cause = %cause, attempt = failed_attempts, "control plane failure, backing off");
        sleep(self.poll_backoff).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use mockall::Sequence;
    use serde_json::json;
    use std::sync::Arc;

    use rill_web::app::todo_app;
    use rill_web::store::TodoStore;

    use crate::client::MockRuntimeApi;

    fn adapter() -> EventAdapter {
        EventAdapter::new(todo_app(Arc::new(TodoStore::new())).unwrap())
    }

    fn config(max_attempts: Option<u32>) -> RuntimeConfig {
        RuntimeConfig { endpoint: "127.0.0.1:9001".to_string(), poll_backoff: Duration::ZERO, max_attempts }
    }

    fn invocation(payload: serde_json::Value) -> Invocation {
        Invocation { request_id: "req-1".to_string(), payload: Bytes::from(payload.to_string()) }
    }

    fn transport_failure() -> LambdaError {
        LambdaError::transport("connection refused")
    }

    #[tokio::test]
    async fn successful_invocation_posts_a_response_envelope() {
        let mut api = MockRuntimeApi::new();
        let mut seq = Sequence::new();

        api.expect_next_invocation()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(invocation(json!({ "rawPath": "/health" }))));
        api.expect_send_response()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|request_id, envelope| {
                request_id == "req-1" && envelope.status_code == 200 && envelope.body.contains("healthy")
            })
            .returning(|_, _| Ok(()));
        // Ends the otherwise endless loop.
        api.expect_next_invocation().times(1).in_sequence(&mut seq).returning(|| Err(transport_failure()));

        let result = InvocationLoop::new(api, adapter(), &config(Some(1))).run().await;
        assert!(matches!(result, Err(LambdaError::AttemptsExhausted { attempts: 1 })));
    }

    #[tokio::test]
    async fn unrecognized_event_posts_an_error_envelope() {
        let mut api = MockRuntimeApi::new();
        let mut seq = Sequence::new();

        api.expect_next_invocation()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(invocation(json!({ "Records": [] }))));
        api.expect_send_error()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|request_id, envelope| {
                request_id == "req-1" && envelope.error_type == "InvalidEvent" && !envelope.error_message.is_empty()
            })
            .returning(|_, _| Ok(()));
        api.expect_next_invocation().times(1).in_sequence(&mut seq).returning(|| Err(transport_failure()));

        let result = InvocationLoop::new(api, adapter(), &config(Some(1))).run().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unparseable_payload_posts_an_error_envelope() {
        let mut api = MockRuntimeApi::new();
        let mut seq = Sequence::new();

        api.expect_next_invocation().times(1).in_sequence(&mut seq).returning(|| {
            Ok(Invocation { request_id: "req-1".to_string(), payload: Bytes::from_static(b"not json") })
        });
        api.expect_send_error()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|_, envelope| envelope.error_type == "Serialization" && !envelope.error_message.is_empty())
            .returning(|_, _| Ok(()));
        api.expect_next_invocation().times(1).in_sequence(&mut seq).returning(|| Err(transport_failure()));

        let result = InvocationLoop::new(api, adapter(), &config(Some(1))).run().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn transport_failures_retry_up_to_max_attempts() {
        let mut api = MockRuntimeApi::new();
        api.expect_next_invocation().times(3).returning(|| Err(transport_failure()));

        let result = InvocationLoop::new(api, adapter(), &config(Some(3))).run().await;
        assert!(matches!(result, Err(LambdaError::AttemptsExhausted { attempts: 3 })));
    }

    #[tokio::test]
    async fn successful_poll_resets_the_failure_budget() {
        let mut api = MockRuntimeApi::new();
        let mut seq = Sequence::new();

        api.expect_next_invocation().times(1).in_sequence(&mut seq).returning(|| Err(transport_failure()));
        api.expect_next_invocation()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(invocation(json!({ "rawPath": "/health" }))));
        api.expect_send_response().times(1).in_sequence(&mut seq).returning(|_, _| Ok(()));
        // Takes two more consecutive failures to exhaust a budget of two.
        api.expect_next_invocation().times(2).in_sequence(&mut seq).returning(|| Err(transport_failure()));

        let result = InvocationLoop::new(api, adapter(), &config(Some(2))).run().await;
        assert!(matches!(result, Err(LambdaError::AttemptsExhausted { attempts: 2 })));
    }

    #[tokio::test]
    async fn report_failure_backs_off_and_counts_against_the_budget() {
        let mut api = MockRuntimeApi::new();
        let mut seq = Sequence::new();

        api.expect_next_invocation()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(invocation(json!({ "rawPath": "/health" }))));
        api.expect_send_response().times(1).in_sequence(&mut seq).returning(|_, _| Err(transport_failure()));

        let result = InvocationLoop::new(api, adapter(), &config(Some(1))).run().await;
        assert!(matches!(result, Err(LambdaError::AttemptsExhausted { attempts: 1 })));
    }

    #[test]
    fn from_env_requires_the_runtime_api_variable() {
        unsafe { env::remove_var(RUNTIME_API_ENV) };
        assert!(matches!(RuntimeConfig::from_env(), Err(LambdaError::MissingEnv { name: RUNTIME_API_ENV })));

        unsafe { env::set_var(RUNTIME_API_ENV, "127.0.0.1:9001") };
        let config = RuntimeConfig::from_env().unwrap();
        assert_eq!(config.endpoint, "127.0.0.1:9001");
        assert_eq!(config.poll_backoff, DEFAULT_POLL_BACKOFF);
        assert!(config.max_attempts.is_none());
        unsafe { env::remove_var(RUNTIME_API_ENV) };
    }
}
