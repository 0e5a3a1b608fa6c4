//! Site profile configuration.
//!
//! A [`SiteProfile`] describes the one site this pipeline crawls: its base
//! origin, the CSS selectors for listing and article markup, per-page
//! navigation timeouts, the extraction batch size, and the scroll-driver
//! tuning. Profiles are loaded from a YAML file or fall back to compiled-in
//! defaults, so deployments can follow minor markup changes without a
//! rebuild.
//!
//! ```yaml
//! base_url: "https://news.example.com"
//! listing_article_selector: "article"
//! batch_size: 5
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::CrawlError;

fn default_base_url() -> String {
    "https://news.example.com".to_string()
}

fn default_listing_article_selector() -> String {
    "article".to_string()
}

fn default_listing_title_link_selector() -> String {
    "h1 a, h2 a, h3 a".to_string()
}

fn default_content_container_selector() -> String {
    "article".to_string()
}

fn default_listing_timeout_secs() -> u64 {
    10
}

fn default_detail_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    5
}

fn default_scroll_step_px() -> f64 {
    500.0
}

fn default_scroll_tick_ms() -> u64 {
    100
}

fn default_scroll_max_steps() -> u32 {
    200
}

/// Everything the pipeline needs to know about the crawled site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Base origin of the site; relative hrefs are resolved against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Selector for article teaser nodes on the listing page.
    #[serde(default = "default_listing_article_selector")]
    pub listing_article_selector: String,
    /// Selector for the heading-level title link nested in a teaser node.
    #[serde(default = "default_listing_title_link_selector")]
    pub listing_title_link_selector: String,
    /// Selector for the content container on an article detail page.
    #[serde(default = "default_content_container_selector")]
    pub content_container_selector: String,
    /// Navigation timeout for the listing page, in seconds.
    #[serde(default = "default_listing_timeout_secs")]
    pub listing_timeout_secs: u64,
    /// Navigation timeout for article detail pages, in seconds.
    #[serde(default = "default_detail_timeout_secs")]
    pub detail_timeout_secs: u64,
    /// Number of articles extracted concurrently per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Scroll increment in logical pixels.
    #[serde(default = "default_scroll_step_px")]
    pub scroll_step_px: f64,
    /// Delay between scroll increments, in milliseconds.
    #[serde(default = "default_scroll_tick_ms")]
    pub scroll_tick_ms: u64,
    /// Safety cap on scroll iterations, bounding pages whose scroll height
    /// keeps growing on every step.
    #[serde(default = "default_scroll_max_steps")]
    pub scroll_max_steps: u32,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            listing_article_selector: default_listing_article_selector(),
            listing_title_link_selector: default_listing_title_link_selector(),
            content_container_selector: default_content_container_selector(),
            listing_timeout_secs: default_listing_timeout_secs(),
            detail_timeout_secs: default_detail_timeout_secs(),
            batch_size: default_batch_size(),
            scroll_step_px: default_scroll_step_px(),
            scroll_tick_ms: default_scroll_tick_ms(),
            scroll_max_steps: default_scroll_max_steps(),
        }
    }
}

impl SiteProfile {
    /// Load a profile from a YAML file.
    pub async fn load(path: &str) -> Result<Self, CrawlError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CrawlError::Profile(format!("cannot read {path}: {e}")))?;
        serde_yaml::from_str(&raw).map_err(|e| CrawlError::Profile(format!("bad YAML in {path}: {e}")))
    }

    /// The site's bare origin (scheme + host + port), used to prefix
    /// relative hrefs and to filter empty listing links.
    pub fn origin(&self) -> Result<String, CrawlError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| CrawlError::Profile(format!("bad base_url {:?}: {e}", self.base_url)))?;
        Ok(url.origin().ascii_serialization())
    }

    /// Absolute URL of a category listing page.
    pub fn category_url(&self, category_path: &str) -> Result<String, CrawlError> {
        let origin = self.origin()?;
        if category_path.starts_with("http") {
            return Ok(category_path.to_string());
        }
        let path = category_path.trim_start_matches('/');
        Ok(format!("{origin}/{path}"))
    }

    /// Listing-page navigation timeout.
    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    /// Article detail navigation timeout.
    pub fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let profile = SiteProfile::default();
        assert_eq!(profile.batch_size, 5);
        assert_eq!(profile.listing_timeout_secs, 10);
        assert_eq!(profile.detail_timeout_secs, 30);
        assert_eq!(profile.scroll_step_px, 500.0);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let profile: SiteProfile =
            serde_yaml::from_str("base_url: \"https://lenta.example.org\"\nbatch_size: 3\n")
                .unwrap();
        assert_eq!(profile.base_url, "https://lenta.example.org");
        assert_eq!(profile.batch_size, 3);
        assert_eq!(profile.listing_article_selector, "article");
    }

    #[test]
    fn test_origin_strips_path() {
        let profile = SiteProfile {
            base_url: "https://news.example.com/some/page".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.origin().unwrap(), "https://news.example.com");
    }

    #[test]
    fn test_category_url_joins_path() {
        let profile = SiteProfile::default();
        assert_eq!(
            profile.category_url("/news/tech").unwrap(),
            "https://news.example.com/news/tech"
        );
        assert_eq!(
            profile.category_url("news/tech").unwrap(),
            "https://news.example.com/news/tech"
        );
    }

    #[test]
    fn test_category_url_passes_through_absolute() {
        let profile = SiteProfile::default();
        assert_eq!(
            profile.category_url("https://other.example.com/cat").unwrap(),
            "https://other.example.com/cat"
        );
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let profile = SiteProfile {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(profile.origin().is_err());
    }
}
