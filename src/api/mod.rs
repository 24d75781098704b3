//! Reporting API access.
//!
//! The dashboard reads from a single remote API. [`Endpoint`] lists the
//! paths it exposes, [`AnalyticsSource`] is the seam views fetch through,
//! and [`client::ApiClient`] is the HTTP implementation.

pub mod client;

use anyhow::Result;

use crate::analytics::AnalyticsReport;

pub use client::ApiClient;

/// Paths served by the reporting API, relative to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Docs,
    Health,
    Reports,
    Detection,
    Analytics,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Docs => "/docs",
            Self::Health => "/health",
            Self::Reports => "/api/v1/reports/",
            Self::Detection => "/api/v1/detect",
            Self::Analytics => "/api/v1/analytics/",
        }
    }
}

/// Anything that can produce an analytics report.
///
/// Views hold an `Arc<dyn AnalyticsSource>` and call it from a worker
/// thread, hence the `Send + Sync` bound.
pub trait AnalyticsSource: Send + Sync {
    fn fetch_analytics(&self) -> Result<AnalyticsReport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::Analytics.path(), "/api/v1/analytics/");
        assert_eq!(Endpoint::Health.path(), "/health");
        assert_eq!(Endpoint::Reports.path(), "/api/v1/reports/");
    }
}
