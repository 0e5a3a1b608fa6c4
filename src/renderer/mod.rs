//! Page rendering boundary.
//!
//! The pipeline never talks to a browser or HTTP client directly; it goes
//! through the [`PageRenderer`] trait. A renderer opens a URL and hands back
//! a [`PageSession`], a scoped resource that must be closed on every exit
//! path, including navigation failures (implementations release the page
//! before propagating the error).
//!
//! Two implementations ship with the crate:
//!
//! - [`http::HttpRenderer`]: plain `reqwest` fetch; suitable when the target
//!   markup is fully server-rendered. Scroll operations are no-ops.
//! - [`chromium::ChromiumRenderer`] (feature `browser`): headless Chrome via
//!   `chromiumoxide`, for listings that lazy-load content on scroll.
//!
//! Extraction logic itself runs in Rust over [`PageSession::html`] with the
//! `scraper` crate rather than as in-page script.

pub mod http;
pub mod scroll;

#[cfg(feature = "browser")]
pub mod chromium;

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::RenderError;

/// Scroll geometry of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Total scrollable document height in logical pixels.
    pub scroll_height: f64,
    /// Visible viewport height in logical pixels.
    pub viewport_height: f64,
}

/// Opens pages and produces scoped [`PageSession`]s.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigate to `url`, wait for the content-loaded signal, and return a
    /// live session. On navigation failure the underlying page is released
    /// before the error is returned.
    async fn open(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Box<dyn PageSession>, RenderError>;
}

/// A live page. Owns the underlying handle for its lifetime only:
/// acquire, use, release.
#[async_trait]
pub trait PageSession: Send {
    /// Serialize the current DOM to HTML.
    async fn html(&self) -> Result<String, RenderError>;

    /// Scroll the viewport down by `delta_px` logical pixels.
    async fn scroll_by(&self, delta_px: f64) -> Result<(), RenderError>;

    /// Current scroll geometry.
    async fn scroll_metrics(&self) -> Result<ScrollMetrics, RenderError>;

    /// Release the page. Callers must reach this on every exit path.
    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}
