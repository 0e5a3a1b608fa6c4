//! Scroll driver for lazy-loaded listing pages.
//!
//! Repeatedly scrolls the viewport down by a fixed increment on a timer,
//! accumulating total scrolled distance, until the accumulated distance
//! covers `scroll_height - viewport_height`. Geometry is re-read every tick
//! so content appended by lazy loading extends the target.
//!
//! The loop is bounded by `scroll_max_steps` so a page whose height grows
//! on every scroll cannot wedge a run; hitting the cap logs a warning and
//! returns normally.

use std::time::Duration;
use tracing::{debug, warn};

use super::PageSession;
use crate::config::SiteProfile;
use crate::errors::RenderError;

/// Scroll `session` until its full scrollable height has been traversed.
///
/// Runs only against the listing page; article detail pages are parsed
/// as-rendered.
pub async fn scroll_to_bottom(
    session: &dyn PageSession,
    profile: &SiteProfile,
) -> Result<(), RenderError> {
    let step = profile.scroll_step_px;
    let tick = Duration::from_millis(profile.scroll_tick_ms);
    let mut scrolled = 0.0_f64;
    let mut steps = 0_u32;

    loop {
        let metrics = session.scroll_metrics().await?;
        let target = (metrics.scroll_height - metrics.viewport_height).max(0.0);
        if scrolled >= target {
            break;
        }
        if steps >= profile.scroll_max_steps {
            warn!(
                steps,
                scrolled,
                target,
                "Scroll safety cap reached before the page settled"
            );
            break;
        }
        session.scroll_by(step).await?;
        scrolled += step;
        steps += 1;
        tokio::time::sleep(tick).await;
    }

    debug!(steps, scrolled, "Scroll driver finished");
    Ok(())
}
