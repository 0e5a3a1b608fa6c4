//! Ingestion orchestrator.
//!
//! Hands every successfully extracted article to the content store,
//! concurrently, with the same isolate-and-aggregate pattern as the batch
//! scheduler: one article is one isolation unit, independent failures never
//! cancel siblings, and there is no rollback of already-created posts on
//! partial failure.

use futures::future::join_all;
use tracing::instrument;

use crate::events::{EventSink, PipelineEvent};
use crate::models::{ArticleDetail, IngestionOutcome};
use crate::store::ContentStore;

/// Create one news post per article, recording a per-article outcome.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), %owner_id))]
pub async fn ingest_articles(
    store: &dyn ContentStore,
    events: &dyn EventSink,
    owner_id: &str,
    articles: &[ArticleDetail],
) -> Vec<IngestionOutcome> {
    events.emit(&PipelineEvent::IngestionStarted {
        articles: articles.len(),
    });

    let tasks = articles.iter().map(|article| async move {
        match store.create_news_post(owner_id, article).await {
            Ok(created) => {
                events.emit(&PipelineEvent::ArticleIngested {
                    id: created.id.clone(),
                });
                IngestionOutcome::Created { id: created.id }
            }
            Err(e) => {
                let reason = e.to_string();
                events.emit(&PipelineEvent::IngestionFailed {
                    title: article.title.clone(),
                    reason: reason.clone(),
                });
                IngestionOutcome::Failed {
                    title: article.title.clone(),
                    reason,
                }
            }
        }
    });

    join_all(tasks).await
}

/// Split outcomes into created ids and `(title, reason)` failures.
pub fn split_outcomes(outcomes: Vec<IngestionOutcome>) -> (Vec<String>, Vec<(String, String)>) {
    let mut created = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            IngestionOutcome::Created { id } => created.push(id),
            IngestionOutcome::Failed { title, reason } => failures.push((title, reason)),
        }
    }
    (created, failures)
}
