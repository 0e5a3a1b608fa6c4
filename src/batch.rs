//! Batch scheduler: sequential batches of concurrent extractions.
//!
//! The URL list is partitioned into consecutive chunks of at most
//! `batch_size` (5 by default). Chunks run strictly in sequence: chunk
//! *i+1* starts only after every task in chunk *i* has produced an outcome.
//! Within a chunk all extractions start together and are awaited as a
//! group with `join_all`, so completion order inside a batch is
//! unconstrained.
//!
//! One article is one isolation unit: a failed extraction becomes a
//! [`BatchOutcome::Failed`] record and never cancels sibling tasks in the
//! same chunk nor prevents later chunks from running. Outcomes travel as
//! per-task return values; no shared counters are mutated across tasks.

use futures::future::join_all;
use tracing::instrument;

use crate::config::SiteProfile;
use crate::events::{EventSink, PipelineEvent};
use crate::extractor::fetch_article;
use crate::models::{ArticleDetail, BatchOutcome};
use crate::renderer::PageRenderer;

/// Extract every URL in fixed-size sequential batches.
///
/// Returns one outcome per input URL, grouped by batch in input order.
#[instrument(level = "info", skip_all, fields(urls = urls.len()))]
pub async fn extract_in_batches(
    renderer: &dyn PageRenderer,
    profile: &SiteProfile,
    events: &dyn EventSink,
    urls: &[String],
    category_id: Option<&str>,
    tags: Option<&[String]>,
) -> Vec<BatchOutcome> {
    let batch_size = profile.batch_size.max(1);
    let mut outcomes = Vec::with_capacity(urls.len());

    for (index, chunk) in urls.chunks(batch_size).enumerate() {
        events.emit(&PipelineEvent::BatchStarted {
            index,
            size: chunk.len(),
        });

        let tasks = chunk.iter().map(|url| async move {
            match fetch_article(
                renderer,
                profile,
                url,
                category_id.map(str::to_string),
                tags.map(<[String]>::to_vec),
            )
            .await
            {
                Ok(article) => {
                    events.emit(&PipelineEvent::ArticleExtracted { url: url.clone() });
                    BatchOutcome::Extracted(article)
                }
                Err(e) => {
                    let reason = e.to_string();
                    events.emit(&PipelineEvent::ExtractionFailed {
                        url: url.clone(),
                        reason: reason.clone(),
                    });
                    BatchOutcome::Failed {
                        url: url.clone(),
                        reason,
                    }
                }
            }
        });

        outcomes.extend(join_all(tasks).await);
    }

    outcomes
}

/// Split outcomes into extracted articles and `(url, reason)` failures.
pub fn split_outcomes(outcomes: Vec<BatchOutcome>) -> (Vec<ArticleDetail>, Vec<(String, String)>) {
    let mut articles = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            BatchOutcome::Extracted(article) => articles.push(article),
            BatchOutcome::Failed { url, reason } => failures.push((url, reason)),
        }
    }
    (articles, failures)
}
