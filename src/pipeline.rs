//! Top-level pipeline entry points.
//!
//! One crawl run is a single linear pass with no persistent state machine:
//!
//! ```text
//! Discover -> (Extract x N, isolated) -> (Ingest x M, isolated) -> Report
//! ```
//!
//! Only listing-page discovery may fail the run; every other failure is
//! captured into per-article outcome records inside the returned
//! [`CrawlReport`]. There is no pause/resume and no mid-run cancellation;
//! re-running over an unchanged listing reproduces every article as a
//! fresh post, since no de-duplication is performed.

use chrono::Utc;
use tracing::{info, instrument};

use crate::batch;
use crate::config::SiteProfile;
use crate::discovery::discover_links;
use crate::errors::CrawlError;
use crate::events::{EventSink, PipelineEvent};
use crate::extractor::fetch_article;
use crate::ingest;
use crate::models::{ArticleDetail, CrawlRequest, CrawlReport};
use crate::renderer::PageRenderer;
use crate::store::ContentStore;

/// Crawl a category: discover links, extract in batches, ingest, report.
///
/// Returns `Err` only when listing-page navigation fails; all per-article
/// failures are reported inside the `Ok` report.
#[instrument(level = "info", skip_all, fields(category = %request.category_path, owner = %request.owner_id))]
pub async fn crawl_category(
    renderer: &dyn PageRenderer,
    store: &dyn ContentStore,
    events: &dyn EventSink,
    profile: &SiteProfile,
    request: &CrawlRequest,
) -> Result<CrawlReport, CrawlError> {
    let category_url = profile.category_url(&request.category_path)?;

    events.emit(&PipelineEvent::DiscoveryStarted {
        category_url: category_url.clone(),
    });
    let links = discover_links(renderer, profile, &category_url).await?;
    events.emit(&PipelineEvent::DiscoveryCompleted { links: links.len() });

    let outcomes = batch::extract_in_batches(
        renderer,
        profile,
        events,
        &links,
        request.category_id.as_deref(),
        request.tags.as_deref(),
    )
    .await;
    let (articles, extraction_failures) = batch::split_outcomes(outcomes);
    events.emit(&PipelineEvent::ExtractionCompleted {
        extracted: articles.len(),
        failed: extraction_failures.len(),
    });

    let ingestion = ingest::ingest_articles(store, events, &request.owner_id, &articles).await;
    let (created, ingestion_failures) = ingest::split_outcomes(ingestion);

    events.emit(&PipelineEvent::RunCompleted {
        extracted: articles.len(),
        extraction_failures: extraction_failures.len(),
        ingested: created.len(),
        ingestion_failures: ingestion_failures.len(),
    });
    info!(
        extracted = articles.len(),
        ingested = created.len(),
        "Crawl run finished"
    );

    Ok(CrawlReport {
        extracted: articles.len(),
        articles,
        extraction_failures,
        ingested: created.len(),
        ingestion_failures,
        finished_at: Utc::now(),
    })
}

/// Ad hoc single-article fetch: extraction only, no discovery, no
/// ingestion.
#[instrument(level = "info", skip(renderer, profile))]
pub async fn extract_article(
    renderer: &dyn PageRenderer,
    profile: &SiteProfile,
    url: &str,
    category_id: Option<&str>,
    tags_csv: Option<&str>,
) -> Result<ArticleDetail, CrawlError> {
    fetch_article(
        renderer,
        profile,
        url,
        category_id.map(str::to_string),
        split_tags_csv(tags_csv),
    )
    .await
}

/// Split a comma-separated tag-id string into a tag sequence.
///
/// Empty segments are dropped; an input with no usable segments yields
/// `None`.
pub fn split_tags_csv(tags_csv: Option<&str>) -> Option<Vec<String>> {
    let tags: Vec<String> = tags_csv?
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tags.is_empty() { None } else { Some(tags) }
}
