//! JSON report output.
//!
//! Serializes a [`CrawlReport`] to a date-partitioned JSON file so operators
//! can inspect what a run attempted, what failed, and why:
//!
//! ```text
//! report_dir/
//! └── 2025-08-29/
//!     └── 143052-crawl.json
//! ```

use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

use crate::models::CrawlReport;

/// Write a crawl report under `report_dir`, returning the file path.
#[instrument(level = "info", skip(report))]
pub async fn write_report(
    report: &CrawlReport,
    report_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let day_dir = format!(
        "{}/{}",
        report_dir.trim_end_matches('/'),
        report.finished_at.format("%Y-%m-%d")
    );
    fs::create_dir_all(&day_dir).await?;

    let path = format!("{day_dir}/{}-crawl.json", report.finished_at.format("%H%M%S"));
    fs::write(&path, json).await?;
    info!(%path, "Wrote crawl report");

    Ok(path)
}
