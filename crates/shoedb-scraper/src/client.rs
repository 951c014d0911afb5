//! HTTP client for the paginated catalog listing.

use std::time::Duration;

use reqwest::Client;
use shoedb_core::retry_with_backoff;

use crate::error::ScraperError;

/// Default wait reported for a 429 response without a usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP client for catalog listing pages.
///
/// Non-2xx responses are returned as typed errors. Transient failures
/// (429, 5xx, network errors) are retried with exponential backoff up to
/// `max_retries` additional attempts; with `max_retries = 0` every page is
/// fetched exactly once.
pub struct CatalogClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one listing page and returns its body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network, TLS, timeout, or body read failure.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(
            self.max_retries,
            self.backoff_base_secs,
            ScraperError::is_retriable,
            || async move {
                let response = self
                    .client
                    .get(url)
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                    )
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    let domain = response.url().host_str().unwrap_or_default().to_owned();
                    return Err(ScraperError::RateLimited {
                        domain,
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                }

                Ok(response.text().await?)
            },
        )
        .await
    }

    /// Builds the URL of listing page `page` by setting the `page` query
    /// parameter on `base`. Other query parameters are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidCatalogUrl`] if `base` is not an
    /// absolute URL.
    pub fn page_url(base: &str, page: u32) -> Result<String, ScraperError> {
        let mut url = reqwest::Url::parse(base).map_err(|e| ScraperError::InvalidCatalogUrl {
            url: base.to_owned(),
            reason: e.to_string(),
        })?;

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "page")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &kept {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("page", &page.to_string());
        }

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
