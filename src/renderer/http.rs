//! Plain-HTTP page renderer.
//!
//! Fetches the document once with `reqwest` and serves the held body as the
//! "rendered" DOM. Scroll operations are no-ops reporting zero geometry: a
//! fully served document has nothing lazy-loaded left to defeat, so the
//! scroll driver terminates immediately.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{PageRenderer, PageSession, ScrollMetrics};
use crate::errors::RenderError;

/// Renderer backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Create a renderer with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    #[instrument(level = "debug", skip(self))]
    async fn open(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Box<dyn PageSession>, RenderError> {
        let request = self.client.get(url).timeout(timeout).send();
        let response = match tokio::time::timeout(timeout, request).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(RenderError::Timeout {
                    url: url.to_string(),
                    timeout,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        debug!(bytes = html.len(), %url, "Fetched page over HTTP");
        Ok(Box::new(HttpSession { html }))
    }
}

/// Session over a body that was fully fetched at open time.
struct HttpSession {
    html: String,
}

#[async_trait]
impl PageSession for HttpSession {
    async fn html(&self) -> Result<String, RenderError> {
        Ok(self.html.clone())
    }

    async fn scroll_by(&self, _delta_px: f64) -> Result<(), RenderError> {
        Ok(())
    }

    async fn scroll_metrics(&self) -> Result<ScrollMetrics, RenderError> {
        Ok(ScrollMetrics {
            scroll_height: 0.0,
            viewport_height: 0.0,
        })
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        Ok(())
    }
}
