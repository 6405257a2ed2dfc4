//! Retry delays for the transient failure modes of the upstream site.

use std::time::Duration;

/// Phrases the upstream embeds in HTTP 200 bodies when it is overloaded or failing.
pub const SERVICE_ERROR_MARKERS: [&str; 3] =
    ["Too Many Requests", "The service is unavailable", "Error"];

/// Why a fetch attempt is going to be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCause {
    /// The body carried one of [`SERVICE_ERROR_MARKERS`].
    ServiceError(&'static str),
    /// Status other than 200.
    NonOkStatus(u16),
    Timeout,
    Connect,
    /// The static page did not contain the expected script block.
    MalformedPage,
}

/// Fixed sleep per retry cause. Retries are unbounded; only the delay is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub service_error: Duration,
    pub non_ok_status: Duration,
    pub timeout: Duration,
    pub connect: Duration,
    pub malformed_page: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            service_error: Duration::from_secs(5),
            non_ok_status: Duration::from_secs(1),
            timeout: Duration::from_secs(1),
            connect: Duration::from_millis(100),
            malformed_page: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Retry without sleeping. Intended for tests with scripted transports.
    pub const fn immediate() -> Self {
        Self {
            service_error: Duration::ZERO,
            non_ok_status: Duration::ZERO,
            timeout: Duration::ZERO,
            connect: Duration::ZERO,
            malformed_page: Duration::ZERO,
        }
    }

    pub const fn delay_for(&self, cause: RetryCause) -> Duration {
        match cause {
            RetryCause::ServiceError(_) => self.service_error,
            RetryCause::NonOkStatus(_) => self.non_ok_status,
            RetryCause::Timeout => self.timeout,
            RetryCause::Connect => self.connect,
            RetryCause::MalformedPage => self.malformed_page,
        }
    }
}

/// First service-error marker contained in `body`, if any.
pub fn find_service_error(body: &str) -> Option<&'static str> {
    SERVICE_ERROR_MARKERS
        .into_iter()
        .find(|marker| body.contains(marker))
}
