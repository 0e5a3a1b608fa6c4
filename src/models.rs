//! Data models for the crawl/extract/ingest pipeline.
//!
//! This module defines the core data structures flowing through the pipeline:
//! - [`CrawlRequest`]: One crawl invocation (owner, category, optional tags)
//! - [`ContentBlock`]: One ordered unit of article body content
//! - [`ArticleDetail`]: A fully parsed article ready for ingestion
//! - [`BatchOutcome`] / [`IngestionOutcome`]: Per-article tagged results
//! - [`CrawlReport`]: The aggregate a caller receives for one run
//!
//! `ContentBlock.order` values within one article are unique, gap-free and
//! strictly increasing from 1, assigned during a single left-to-right DOM
//! walk in the extractor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters for one crawl invocation.
///
/// Created per run by the transport layer; immutable and never persisted
/// by this crate.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Identity that will own the ingested posts.
    pub owner_id: String,
    /// Category path appended to the site's base origin (e.g. `/news/tech`).
    pub category_path: String,
    /// Optional category id forwarded onto every extracted article.
    pub category_id: Option<String>,
    /// Optional tag ids forwarded onto every extracted article.
    pub tags: Option<Vec<String>>,
}

/// The kind of content carried by a [`ContentBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// A paragraph of body text.
    Text,
    /// An image with an optional caption.
    Image,
}

/// One ordered unit of article body content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Whether this block is body text or an image.
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Paragraph text for [`BlockKind::Text`]; caption for [`BlockKind::Image`].
    pub content: String,
    /// Image URL, present only on [`BlockKind::Image`] blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// 1-based position in the article body, shared across both block kinds.
    pub order: u32,
}

/// A structured article produced by the extractor.
///
/// Has no identity until the downstream content store creates a post
/// from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDetail {
    /// Article headline, from `og:title` or the document title.
    pub title: String,
    /// Article summary; never null, may be empty. When derived from body
    /// text it is capped at 200 characters plus an ellipsis marker.
    pub summary: String,
    /// Cover image URL; always originates from one of the image blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Ordered body blocks in document order.
    pub blocks: Vec<ContentBlock>,
    /// Category id carried over from the crawl request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Tag ids carried over from the crawl request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Per-URL result of one extraction attempt inside a batch.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    /// The article was fetched and parsed.
    Extracted(ArticleDetail),
    /// Navigation or evaluation failed for this URL; siblings are unaffected.
    Failed {
        /// The article URL that failed.
        url: String,
        /// Human-readable failure reason, retained for reporting.
        reason: String,
    },
}

/// Per-article result of one downstream creation attempt.
#[derive(Debug, Clone)]
pub enum IngestionOutcome {
    /// The content store accepted the article.
    Created {
        /// Identifier assigned by the content store.
        id: String,
    },
    /// The content store rejected the article; reasons are opaque.
    Failed {
        /// Title of the article that failed, for reporting.
        title: String,
        /// Opaque failure reason.
        reason: String,
    },
}

/// Aggregate result of one crawl run.
///
/// The caller always receives every attempted article with a clear
/// success/failure tag and reason, plus aggregate counts, never a silent
/// partial result indistinguishable from full success.
#[derive(Debug, Serialize)]
pub struct CrawlReport {
    /// Every successfully extracted article, whether or not ingestion
    /// succeeded for it.
    pub articles: Vec<ArticleDetail>,
    /// Number of successful extractions.
    pub extracted: usize,
    /// `(url, reason)` for every failed extraction.
    pub extraction_failures: Vec<(String, String)>,
    /// Number of successfully created posts.
    pub ingested: usize,
    /// `(title, reason)` for every failed ingestion.
    pub ingestion_failures: Vec<(String, String)>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article() -> ArticleDetail {
        ArticleDetail {
            title: "Test Article".to_string(),
            summary: "A summary".to_string(),
            cover_image: Some("https://example.com/cover.jpg".to_string()),
            blocks: vec![
                ContentBlock {
                    kind: BlockKind::Text,
                    content: "First paragraph".to_string(),
                    media_url: None,
                    order: 1,
                },
                ContentBlock {
                    kind: BlockKind::Image,
                    content: "A caption".to_string(),
                    media_url: Some("https://example.com/cover.jpg".to_string()),
                    order: 2,
                },
            ],
            category_id: Some("42".to_string()),
            tags: Some(vec!["7".to_string(), "9".to_string()]),
        }
    }

    #[test]
    fn test_block_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BlockKind::Text).unwrap(), "\"text\"");
        assert_eq!(
            serde_json::to_string(&BlockKind::Image).unwrap(),
            "\"image\""
        );
    }

    #[test]
    fn test_content_block_type_field_name() {
        let block = ContentBlock {
            kind: BlockKind::Text,
            content: "Hello".to_string(),
            media_url: None,
            order: 1,
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "text");
        // Text blocks carry no media URL at all.
        assert!(json.get("media_url").is_none());
    }

    #[test]
    fn test_article_detail_round_trip() {
        let article = sample_article();
        let json = serde_json::to_string(&article).unwrap();
        let back: ArticleDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, "Test Article");
        assert_eq!(back.blocks.len(), 2);
        assert_eq!(back.blocks[1].order, 2);
        assert_eq!(
            back.cover_image.as_deref(),
            Some("https://example.com/cover.jpg")
        );
    }

    #[test]
    fn test_block_orders_gap_free() {
        let article = sample_article();
        for (i, block) in article.blocks.iter().enumerate() {
            assert_eq!(block.order, i as u32 + 1);
        }
    }

    #[test]
    fn test_crawl_report_serialization() {
        let report = CrawlReport {
            articles: vec![sample_article()],
            extracted: 1,
            extraction_failures: vec![(
                "https://example.com/bad".to_string(),
                "timeout".to_string(),
            )],
            ingested: 0,
            ingestion_failures: vec![("Test Article".to_string(), "validation".to_string())],
            finished_at: Utc::now(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["extracted"], 1);
        assert_eq!(json["extraction_failures"][0][1], "timeout");
        assert_eq!(json["articles"][0]["title"], "Test Article");
    }
}
