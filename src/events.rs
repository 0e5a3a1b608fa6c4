//! Structured pipeline events and the injected observability collaborator.
//!
//! The pipeline never logs presentation-level messages directly; it emits
//! [`PipelineEvent`]s into an injected [`EventSink`]. The default
//! [`TracingSink`] forwards each event to `tracing` with an `event_kind`
//! field, so a run produces a machine-filterable stream like:
//!
//! ```text
//! event_kind="discovery.completed" links=7
//! event_kind="batch.started" index=0 size=5
//! event_kind="extraction.failed" url=... reason=...
//! ```
//!
//! Tests inject a [`RecordingSink`] and assert on the captured sequence,
//! which doubles as the behavioral contract for what gets counted.

use std::sync::Mutex;
use tracing::{info, warn};

/// One observable step of a crawl run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Listing-page navigation is starting.
    DiscoveryStarted {
        /// The category listing URL.
        category_url: String,
    },
    /// Link discovery finished.
    DiscoveryCompleted {
        /// Number of article links found, duplicates included.
        links: usize,
    },
    /// A batch of extractions is starting.
    BatchStarted {
        /// 0-based batch index.
        index: usize,
        /// Number of URLs in this batch.
        size: usize,
    },
    /// One article was fetched and parsed.
    ArticleExtracted {
        /// The article URL.
        url: String,
    },
    /// One article's extraction failed; the run continues.
    ExtractionFailed {
        /// The article URL.
        url: String,
        /// Captured failure reason.
        reason: String,
    },
    /// All batches finished.
    ExtractionCompleted {
        /// Number of successful extractions.
        extracted: usize,
        /// Number of failed extractions.
        failed: usize,
    },
    /// Downstream ingestion is starting.
    IngestionStarted {
        /// Number of articles handed to the content store.
        articles: usize,
    },
    /// The content store created a post.
    ArticleIngested {
        /// Identifier assigned by the store.
        id: String,
    },
    /// One article's ingestion failed; the run continues.
    IngestionFailed {
        /// Title of the rejected article.
        title: String,
        /// Opaque failure reason.
        reason: String,
    },
    /// The run finished and the report is about to be returned.
    RunCompleted {
        /// Successful extractions.
        extracted: usize,
        /// Failed extractions.
        extraction_failures: usize,
        /// Successful ingestions.
        ingested: usize,
        /// Failed ingestions.
        ingestion_failures: usize,
    },
}

/// Receiver for pipeline events.
///
/// Implementations must be cheap and non-blocking; the pipeline emits from
/// inside concurrent tasks.
pub trait EventSink: Send + Sync {
    /// Record one event.
    fn emit(&self, event: &PipelineEvent);
}

/// Default sink forwarding events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::DiscoveryStarted { category_url } => {
                info!(event_kind = "discovery.started", %category_url, "Discovering article links");
            }
            PipelineEvent::DiscoveryCompleted { links } => {
                info!(event_kind = "discovery.completed", links, "Link discovery completed");
            }
            PipelineEvent::BatchStarted { index, size } => {
                info!(event_kind = "batch.started", index, size, "Starting extraction batch");
            }
            PipelineEvent::ArticleExtracted { url } => {
                info!(event_kind = "extraction.succeeded", %url, "Extracted article");
            }
            PipelineEvent::ExtractionFailed { url, reason } => {
                warn!(event_kind = "extraction.failed", %url, %reason, "Article extraction failed");
            }
            PipelineEvent::ExtractionCompleted { extracted, failed } => {
                info!(
                    event_kind = "extraction.completed",
                    extracted, failed, "Extraction phase completed"
                );
            }
            PipelineEvent::IngestionStarted { articles } => {
                info!(event_kind = "ingestion.started", articles, "Starting ingestion");
            }
            PipelineEvent::ArticleIngested { id } => {
                info!(event_kind = "ingestion.succeeded", %id, "Created news post");
            }
            PipelineEvent::IngestionFailed { title, reason } => {
                warn!(event_kind = "ingestion.failed", %title, %reason, "Article ingestion failed");
            }
            PipelineEvent::RunCompleted {
                extracted,
                extraction_failures,
                ingested,
                ingestion_failures,
            } => {
                info!(
                    event_kind = "run.completed",
                    extracted,
                    extraction_failures,
                    ingested,
                    ingestion_failures,
                    "Crawl run completed"
                );
            }
        }
    }
}

/// Sink that captures every event in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far, in emission order.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().expect("event sink poisoned").clone()
    }

    /// Count events matching a predicate.
    pub fn count(&self, pred: impl Fn(&PipelineEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &PipelineEvent) {
        self.events
            .lock()
            .expect("event sink poisoned")
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_preserves_order() {
        let sink = RecordingSink::new();
        sink.emit(&PipelineEvent::DiscoveryStarted {
            category_url: "https://example.com/news".to_string(),
        });
        sink.emit(&PipelineEvent::DiscoveryCompleted { links: 3 });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], PipelineEvent::DiscoveryCompleted { links: 3 });
    }

    #[test]
    fn test_recording_sink_count() {
        let sink = RecordingSink::new();
        for index in 0..2 {
            sink.emit(&PipelineEvent::BatchStarted { index, size: 5 });
        }
        assert_eq!(
            sink.count(|e| matches!(e, PipelineEvent::BatchStarted { .. })),
            2
        );
    }
}
