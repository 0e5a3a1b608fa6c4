//! Headless-Chrome page renderer backed by `chromiumoxide`.
//!
//! One browser process is launched (or connected to) per renderer and shared
//! across the run; each [`PageRenderer::open`] call gets its own fresh page,
//! so concurrent extractions in a batch never share renderer state. The page
//! is the scoped resource: it is closed on every exit path, including
//! navigation timeouts and failures.

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::{PageRenderer, PageSession, ScrollMetrics};
use crate::errors::RenderError;

fn browser_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Browser(e.to_string())
}

/// Renderer owning a shared headless-Chrome instance.
pub struct ChromiumRenderer {
    browser: Browser,
}

impl ChromiumRenderer {
    /// Launch a local headless Chrome.
    pub async fn launch() -> Result<Self, RenderError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(browser_err)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_err)?;

        // Drain CDP events for the lifetime of the browser.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!("Launched headless Chrome");
        Ok(Self { browser })
    }

    /// Connect to an already-running Chrome over its debugging WebSocket.
    pub async fn connect(debug_ws_url: &str) -> Result<Self, RenderError> {
        let (browser, mut handler) = Browser::connect(debug_ws_url)
            .await
            .map_err(browser_err)?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!(url = %debug_ws_url, "Connected to remote Chrome");
        Ok(Self { browser })
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    #[instrument(level = "debug", skip(self))]
    async fn open(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Box<dyn PageSession>, RenderError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(browser_err)?;

        let navigation = async {
            page.goto(url).await.map_err(browser_err)?;
            page.wait_for_navigation().await.map_err(browser_err)?;
            Ok::<(), RenderError>(())
        };

        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                // Release the page before the error propagates.
                let _ = page.close().await;
                return Err(e);
            }
            Err(_) => {
                let _ = page.close().await;
                return Err(RenderError::Timeout {
                    url: url.to_string(),
                    timeout,
                });
            }
        }

        debug!(%url, "Navigation complete");
        Ok(Box::new(ChromiumSession { page }))
    }
}

/// One live Chrome tab.
struct ChromiumSession {
    page: Page,
}

impl ChromiumSession {
    async fn eval_f64(&self, script: &str) -> Result<f64, RenderError> {
        self.page
            .evaluate(script)
            .await
            .map_err(browser_err)?
            .into_value::<f64>()
            .map_err(browser_err)
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn html(&self) -> Result<String, RenderError> {
        self.page.content().await.map_err(browser_err)
    }

    async fn scroll_by(&self, delta_px: f64) -> Result<(), RenderError> {
        self.page
            .evaluate(format!("window.scrollBy(0, {delta_px})"))
            .await
            .map_err(browser_err)?;
        Ok(())
    }

    async fn scroll_metrics(&self) -> Result<ScrollMetrics, RenderError> {
        let scroll_height = self.eval_f64("document.body.scrollHeight").await?;
        let viewport_height = self.eval_f64("window.innerHeight").await?;
        Ok(ScrollMetrics {
            scroll_height,
            viewport_height,
        })
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.page.close().await.map_err(browser_err)
    }
}
