//! Client configuration, loaded from defaults or `TSETMC_*` environment variables.

use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::ValidationError;

const DEFAULT_BASE_URL: &str = "http://tsetmc.com";

/// Settings shared by every request a [`TseClient`](crate::TseClient) makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and host of the upstream site, without trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    /// Sleep between attempts of [`TseClient::get_static_data_retry`](crate::TseClient::get_static_data_retry).
    pub static_retry_delay: Duration,
    pub static_retry_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            request_timeout: Duration::from_secs(4),
            retry: RetryPolicy::default(),
            static_retry_delay: Duration::from_millis(100),
            static_retry_attempts: 3,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by any of:
    ///
    /// - `TSETMC_BASE_URL`
    /// - `TSETMC_REQUEST_TIMEOUT_MS`
    /// - `TSETMC_SLEEP_SERVICE_ERROR_MS`
    /// - `TSETMC_SLEEP_TIMEOUT_MS`
    /// - `TSETMC_SLEEP_CONNECTION_ERROR_MS`
    /// - `TSETMC_SLEEP_NON_200_MS`
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("TSETMC_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_owned();
        }
        if let Some(timeout) = millis(&lookup, "TSETMC_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = timeout;
        }
        if let Some(delay) = millis(&lookup, "TSETMC_SLEEP_SERVICE_ERROR_MS")? {
            config.retry.service_error = delay;
        }
        if let Some(delay) = millis(&lookup, "TSETMC_SLEEP_TIMEOUT_MS")? {
            config.retry.timeout = delay;
        }
        if let Some(delay) = millis(&lookup, "TSETMC_SLEEP_CONNECTION_ERROR_MS")? {
            config.retry.connect = delay;
        }
        if let Some(delay) = millis(&lookup, "TSETMC_SLEEP_NON_200_MS")? {
            config.retry.non_ok_status = delay;
        }

        Ok(config)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_static_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.static_retry_attempts = attempts;
        self.static_retry_delay = delay;
        self
    }

    pub(crate) fn loader_url(&self) -> String {
        format!("{}/Loader.aspx", self.base_url)
    }

    pub(crate) fn live_url(&self) -> String {
        format!("{}/tsev2/data/instinfodata.aspx", self.base_url)
    }
}

fn millis<F>(lookup: &F, name: &'static str) -> Result<Option<Duration>, ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<u64>()
        .map(|value| Some(Duration::from_millis(value)))
        .map_err(|_| ValidationError::InvalidConfig { name, value: raw })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).expect("defaults are valid");
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.loader_url(), "http://tsetmc.com/Loader.aspx");
        assert_eq!(config.live_url(), "http://tsetmc.com/tsev2/data/instinfodata.aspx");
    }

    #[test]
    fn environment_overrides_timeouts_and_sleeps() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("TSETMC_BASE_URL", "http://mirror.test/"),
            ("TSETMC_REQUEST_TIMEOUT_MS", "2500"),
            ("TSETMC_SLEEP_SERVICE_ERROR_MS", "10"),
            ("TSETMC_SLEEP_TIMEOUT_MS", "20"),
            ("TSETMC_SLEEP_CONNECTION_ERROR_MS", "30"),
            ("TSETMC_SLEEP_NON_200_MS", "40"),
        ]))
        .expect("valid values");

        assert_eq!(config.base_url, "http://mirror.test");
        assert_eq!(config.request_timeout, Duration::from_millis(2_500));
        assert_eq!(config.retry.service_error, Duration::from_millis(10));
        assert_eq!(config.retry.timeout, Duration::from_millis(20));
        assert_eq!(config.retry.connect, Duration::from_millis(30));
        assert_eq!(config.retry.non_ok_status, Duration::from_millis(40));
    }

    #[test]
    fn unparsable_value_is_rejected() {
        let error = ClientConfig::from_lookup(lookup_from(&[("TSETMC_SLEEP_TIMEOUT_MS", "soon")]))
            .expect_err("must fail");
        assert_eq!(
            error,
            ValidationError::InvalidConfig {
                name: "TSETMC_SLEEP_TIMEOUT_MS",
                value: String::from("soon"),
            }
        );
    }
}
