// Archive HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, status mapping, and the
// retry loop. Endpoint methods live in `people.rs` as inherent methods to
// keep this module focused on transport mechanics.

use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::transport::{RetryPolicy, TransportConfig};

/// Public swapi.tech endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.swapi.tech/api/";

/// Async client for the archive's REST API.
///
/// All methods return decoded payloads; HTTP failures surface as
/// [`Error`] after the retry policy is exhausted.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl ArchiveClient {
    /// Create a client from a base URL and transport config.
    ///
    /// The base URL is the API root (e.g. `https://www.swapi.tech/api/`);
    /// a trailing slash is added when missing so relative joins work.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            retry: transport.retry.clone(),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        retry: RetryPolicy,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            retry,
        })
    }

    /// The API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    // ── URL builder ──────────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET with query params, retrying transient failures.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let mut attempt = 0u32;
        loop {
            match self.get_once(url.clone(), params).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    warn!(error = %e, attempt, ?delay, "request failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        trace!(%status, "response received");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    preview(&body).to_owned()
                },
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

/// First 200 bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base_url("http://localhost:1234/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/api/");
        assert_eq!(
            url.join("people").unwrap().as_str(),
            "http://localhost:1234/api/people"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }
}
