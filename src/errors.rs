//! Error types for the crawl pipeline.
//!
//! The taxonomy mirrors the pipeline's failure-isolation rules:
//!
//! - **Discovery failures** ([`CrawlError::Discovery`]) are fatal to the run
//!   and propagate out of the top-level entry points.
//! - **Render and store failures** are recovered at the per-article isolation
//!   boundary and converted into outcome records; they only surface as `Err`
//!   from single-article operations like `extract_article`.
//! - Parse anomalies (missing meta tags, no figures, no qualifying
//!   paragraphs) are not errors at all; the extractor degrades to empty
//!   defaults.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by a page renderer while navigating or evaluating a page.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Navigation did not complete within the per-page timeout.
    #[error("navigation to {url} timed out after {timeout:?}")]
    Timeout {
        /// The URL being navigated to.
        url: String,
        /// The timeout that elapsed.
        timeout: Duration,
    },
    /// The underlying HTTP fetch failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The page responded with a non-success status.
    #[error("unexpected status {status} fetching {url}")]
    Status {
        /// The URL that was fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// A browser-side operation (page open, evaluate, close) failed.
    #[error("browser error: {0}")]
    Browser(String),
}

/// Errors raised by the downstream content store.
///
/// The pipeline never inspects these structurally; they are counted and
/// rendered into per-article failure reasons.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store endpoint could not be reached.
    #[error("content store request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The store rejected the article (validation or persistence error).
    #[error("content store rejected the post: {0}")]
    Rejected(String),
}

/// Top-level error for pipeline entry points.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Navigation to the listing page failed. This is the one non-isolated
    /// failure point and aborts the entire crawl.
    #[error("listing page discovery failed for {url}")]
    Discovery {
        /// The category listing URL.
        url: String,
        /// The underlying render failure.
        #[source]
        source: RenderError,
    },
    /// A render failure surfaced from a single-article operation.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// A store failure surfaced from a single-article operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The configured site profile is unusable (bad base URL or selector).
    #[error("invalid site profile: {0}")]
    Profile(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_error_display() {
        let err = CrawlError::Discovery {
            url: "https://example.com/news".to_string(),
            source: RenderError::Timeout {
                url: "https://example.com/news".to_string(),
                timeout: Duration::from_secs(10),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("listing page discovery failed"));
        assert!(msg.contains("https://example.com/news"));
    }

    #[test]
    fn test_render_error_carries_timeout() {
        let err = RenderError::Timeout {
            url: "https://example.com/a".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert!(err.to_string().contains("30s"));
    }
}
