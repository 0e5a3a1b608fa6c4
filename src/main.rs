//! # newsgrab
//!
//! Thin CLI transport over the crawl/extract/ingest pipeline. One
//! invocation performs one run:
//!
//! ```sh
//! newsgrab --category-path /news/tech --owner-id user-17
//! ```
//!
//! discovers article links on the category listing page, extracts each
//! article in sequential batches of concurrent fetches, hands the parsed
//! articles to the content service, and writes a JSON report of every
//! attempted article and its outcome. With `--url` it instead extracts a
//! single article and prints it as JSON, skipping discovery and ingestion.
//!
//! Only a listing-page navigation failure exits non-zero; per-article
//! failures are reported and counted, never fatal.

use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use newsgrab::cli::Cli;
use newsgrab::events::TracingSink;
use newsgrab::models::CrawlRequest;
use newsgrab::output::write_report;
use newsgrab::renderer::http::HttpRenderer;
use newsgrab::renderer::PageRenderer;
use newsgrab::store::RestContentStore;
use newsgrab::{pipeline, SiteProfile};

#[cfg(feature = "browser")]
use newsgrab::renderer::chromium::ChromiumRenderer;

async fn build_renderer(args: &Cli) -> Result<Box<dyn PageRenderer>, Box<dyn Error>> {
    #[cfg(feature = "browser")]
    if !args.no_browser {
        let renderer = match &args.chrome_ws_url {
            Some(ws_url) => ChromiumRenderer::connect(ws_url).await?,
            None => ChromiumRenderer::launch().await?,
        };
        return Ok(Box::new(renderer));
    }

    #[cfg(not(feature = "browser"))]
    if !args.no_browser {
        warn!("Built without the `browser` feature; fetching over plain HTTP");
    }

    Ok(Box::new(HttpRenderer::new()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsgrab starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let profile = match &args.config {
        Some(path) => {
            let profile = SiteProfile::load(path).await?;
            info!(%path, base_url = %profile.base_url, "Loaded site profile");
            profile
        }
        None => SiteProfile::default(),
    };

    let renderer = build_renderer(&args).await?;

    // --- Ad hoc single-article mode ---
    if let Some(url) = &args.url {
        let article = pipeline::extract_article(
            renderer.as_ref(),
            &profile,
            url,
            args.category_id.as_deref(),
            args.tags.as_deref(),
        )
        .await?;
        println!("{}", serde_json::to_string_pretty(&article)?);
        info!(
            title = %article.title,
            blocks = article.blocks.len(),
            "Extracted single article"
        );
        return Ok(());
    }

    let (Some(category_path), Some(owner_id)) =
        (args.category_path.clone(), args.owner_id.clone())
    else {
        error!("Either --url or both --category-path and --owner-id are required");
        return Err("missing required arguments".into());
    };

    let request = CrawlRequest {
        owner_id,
        category_path,
        category_id: args.category_id.clone(),
        tags: pipeline::split_tags_csv(args.tags.as_deref()),
    };
    let store = RestContentStore::new(args.content_service_url.clone());
    let events = TracingSink;

    // --- Run the pipeline; only discovery failure propagates ---
    let report =
        pipeline::crawl_category(renderer.as_ref(), &store, &events, &profile, &request).await?;

    if !report.extraction_failures.is_empty() {
        warn!(
            failed = report.extraction_failures.len(),
            urls = %report.extraction_failures.iter().map(|(url, _)| url.as_str()).join(", "),
            "Some articles failed extraction"
        );
    }
    if !report.ingestion_failures.is_empty() {
        warn!(
            failed = report.ingestion_failures.len(),
            titles = %report.ingestion_failures.iter().map(|(title, _)| title.as_str()).join(", "),
            "Some articles failed ingestion"
        );
    }

    let report_path = write_report(&report, &args.report_dir).await?;

    let elapsed = start_time.elapsed();
    info!(
        extracted = report.extracted,
        extraction_failures = report.extraction_failures.len(),
        ingested = report.ingested,
        ingestion_failures = report.ingestion_failures.len(),
        %report_path,
        ?elapsed,
        "Execution complete"
    );

    Ok(())
}
