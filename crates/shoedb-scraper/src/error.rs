use thiserror::Error;

/// Page-level failures. Any of these means the page was skipped.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid catalog URL \"{url}\": {reason}")]
    InvalidCatalogUrl { url: String, reason: String },

    #[error("invalid {field} selector \"{selector}\": {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}

impl ScraperError {
    /// Returns `true` if the error represents a transient condition that
    /// should be retried after a backoff delay.
    ///
    /// Retriable: HTTP 429, 5xx responses, and network-level failures
    /// (timeouts, connection resets). Everything else is permanent for the
    /// page in question.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
            ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
            ScraperError::InvalidCatalogUrl { .. } | ScraperError::InvalidSelector { .. } => false,
        }
    }
}
