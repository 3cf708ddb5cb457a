// ── Runtime archive configuration ──
//
// Describes *where* the archive lives and how to talk to it. Never touches
// disk: the CLI resolves file, env and flag values and hands one of these in.

use std::time::Duration;

use holocron_api::{ArchiveClient, DEFAULT_BASE_URL, RetryPolicy, TransportConfig};

use crate::error::CoreError;
use crate::source::DEFAULT_PAGE_SIZE;

/// Settings for connecting to the archive and sizing its pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// API root, e.g. `https://www.swapi.tech/api/`.
    pub base_url: String,
    /// Page size used when a load does not name one.
    pub page_size: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra attempts for transient failures.
    pub max_retries: u32,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

impl ArchiveConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            retry: RetryPolicy::default().max_retries(self.max_retries),
        }
    }

    /// Build an [`ArchiveClient`] for this configuration.
    pub fn build_client(&self) -> Result<ArchiveClient, CoreError> {
        Ok(ArchiveClient::new(&self.base_url, &self.transport())?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_archive() {
        let config = ArchiveConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.transport().retry.max_retries, 2);
    }

    #[test]
    fn bad_url_is_a_config_error() {
        let config = ArchiveConfig {
            base_url: "not a url".into(),
            ..ArchiveConfig::default()
        };
        assert!(matches!(
            config.build_client(),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn client_gets_trailing_slash() {
        let config = ArchiveConfig {
            base_url: "http://localhost:9000/api".into(),
            ..ArchiveConfig::default()
        };
        let client = config.build_client().unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:9000/api/");
        assert_eq!(client.retry_policy().max_retries, config.max_retries);
    }
}
