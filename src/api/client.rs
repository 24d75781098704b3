/// HTTP client for the Haven reporting API.
///
/// Uses the synchronous `ureq` client. One client is built per command or
/// web request from the resolved [`ApiConfig`]; nothing is cached between
/// invocations.
///
/// - **Analytics**: `GET /api/v1/analytics/`, no auth header, no query.
/// - **Health**: `GET /health` with a short timeout.
use std::time::Duration;

use anyhow::{Context, Result};

use super::{AnalyticsSource, Endpoint};
use crate::analytics::AnalyticsReport;
use crate::config::ApiConfig;

/// Timeout for health probes, independent of the configured request timeout.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Synchronous reporting API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Fetch and parse the analytics payload.
    ///
    /// Transport failures, non-2xx statuses, and payloads that don't match
    /// [`AnalyticsReport`] all surface as `Err`.
    pub fn fetch_analytics(&self) -> Result<AnalyticsReport> {
        let url = self.endpoint_url(Endpoint::Analytics);

        let resp = ureq::get(&url)
            .timeout(self.timeout)
            .call()
            .with_context(|| format!("analytics request to {url} failed"))?;

        resp.into_json::<AnalyticsReport>()
            .context("failed to parse analytics response")
    }

    /// Check whether the API answers its health endpoint.
    pub fn is_healthy(&self) -> bool {
        let url = self.endpoint_url(Endpoint::Health);
        ureq::get(&url).timeout(HEALTH_TIMEOUT).call().is_ok()
    }
}

impl AnalyticsSource for ApiClient {
    fn fetch_analytics(&self) -> Result<AnalyticsReport> {
        ApiClient::fetch_analytics(self)
    }
}

/// Strip trailing slashes and pin `localhost` to IPv4.
///
/// On some platforms `localhost` resolves to `::1` first, which stalls when
/// a local API only binds IPv4.
fn normalize_base_url(base_url: &str) -> String {
    base_url
        .trim_end_matches('/')
        .replace("://localhost", "://127.0.0.1")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let client = ApiClient::from_config(&ApiConfig::default());
        assert_eq!(client.base_url(), "https://powerhacks-m2qp.onrender.com");
        assert_eq!(client.timeout, Duration::from_millis(10_000));
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = ApiClient::new("http://example.org/", Duration::from_secs(1));
        assert_eq!(
            client.endpoint_url(Endpoint::Analytics),
            "http://example.org/api/v1/analytics/"
        );
    }

    #[test]
    fn client_pins_localhost_to_ipv4() {
        let client = ApiClient::new("http://localhost:8000//", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            client.endpoint_url(Endpoint::Health),
            "http://127.0.0.1:8000/health"
        );
    }
}
