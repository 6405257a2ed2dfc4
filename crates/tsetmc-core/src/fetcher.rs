//! Blocking GET with unbounded retry on the upstream's transient failure modes.

use std::sync::Arc;
use std::time::Duration;

use crate::http_client::{HttpClient, HttpErrorKind, HttpRequest};
use crate::retry::{find_service_error, RetryCause, RetryPolicy};
use crate::TseError;

/// Issues GET requests and keeps retrying until a usable body arrives.
///
/// Non-200 statuses, bodies carrying a service-error marker, timeouts and connection
/// failures are retried forever with the policy's fixed delays. Any other transport
/// failure is returned to the caller.
#[derive(Clone)]
pub struct Fetcher {
    http_client: Arc<dyn HttpClient>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(http_client: Arc<dyn HttpClient>, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            http_client,
            policy,
            timeout,
        }
    }

    pub fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<String, TseError> {
        let request = params.iter().fold(
            HttpRequest::get(url).with_timeout(self.timeout),
            |request, (name, value)| request.with_query(*name, *value),
        );

        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            let cause = match self.http_client.execute(request.clone()) {
                Ok(response) if !response.is_ok() => {
                    tracing::error!(
                        url = %request.full_url(),
                        status = response.status,
                        attempt,
                        "unexpected status from upstream"
                    );
                    RetryCause::NonOkStatus(response.status)
                }
                Ok(response) => match find_service_error(&response.body) {
                    Some(marker) => {
                        tracing::warn!(
                            url = %request.full_url(),
                            marker,
                            attempt,
                            body = %response.body,
                            "upstream reported a service error"
                        );
                        RetryCause::ServiceError(marker)
                    }
                    None => return Ok(response.body),
                },
                Err(error) if !error.retryable() => return Err(error.into()),
                Err(error) if error.kind() == HttpErrorKind::Timeout => {
                    tracing::warn!(url = %request.full_url(), attempt, %error, "request timed out");
                    RetryCause::Timeout
                }
                Err(error) => {
                    tracing::warn!(url = %request.full_url(), attempt, %error, "connection failed");
                    RetryCause::Connect
                }
            };

            self.pause(cause);
        }
    }

    /// Sleeps for the delay configured for `cause`.
    pub(crate) fn pause(&self, cause: RetryCause) {
        let delay = self.policy.delay_for(cause);
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, ?cause, "sleeping before retry");
            std::thread::sleep(delay);
        }
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("policy", &self.policy)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
