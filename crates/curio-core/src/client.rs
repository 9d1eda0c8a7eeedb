use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::http_client::{HttpClient, HttpFailureKind};
use crate::outcome::{CallError, OutboundCall};
use crate::throttle::CallThrottle;

/// Throttled, timeout-bounded JSON client.
///
/// Every call acquires a slot from the shared pacer first, so no call site
/// can bypass the process-wide ceiling. The response is then validated
/// against the caller's expected shape; a well-formed-but-wrong payload is
/// an upstream contract violation, not a parse bug on our side.
#[derive(Clone)]
pub struct TimedClient {
    transport: Arc<dyn HttpClient>,
    throttle: CallThrottle,
}

impl TimedClient {
    pub fn new(transport: Arc<dyn HttpClient>, throttle: CallThrottle) -> Self {
        Self {
            transport,
            throttle,
        }
    }

    /// Issues one call and decodes the body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, call: OutboundCall) -> Result<T, CallError> {
        self.throttle.acquire().await;

        let timeout = call.timeout;
        let url = call.url.clone();

        let raced = tokio::time::timeout(timeout, self.transport.execute(call)).await;
        let response = match raced {
            Err(_) => {
                tracing::debug!(%url, timeout_ms = timeout.as_millis() as u64, "call timed out");
                return Err(CallError::timeout(timeout));
            }
            Ok(Err(failure)) => {
                let error = match failure.kind {
                    HttpFailureKind::Timeout => CallError::timeout(timeout),
                    HttpFailureKind::Connect | HttpFailureKind::Protocol => {
                        CallError::unreachable(failure.message())
                    }
                };
                tracing::debug!(%url, code = error.code(), "transport failure");
                return Err(error);
            }
            Ok(Ok(response)) => response,
        };

        if !response.is_success() {
            tracing::debug!(%url, status = response.status, "upstream error status");
            return Err(CallError::HttpStatus {
                status: response.status,
            });
        }

        serde_json::from_str::<T>(&response.body).map_err(|e| {
            tracing::debug!(%url, "response failed shape validation");
            CallError::shape_mismatch(e.to_string())
        })
    }
}
