//! # newsgrab
//!
//! A crawl/extract/ingest pipeline that pulls news articles from a
//! third-party site into the internal content store.
//!
//! Given a category path, one run:
//!
//! 1. **Discovers** candidate article URLs from the category listing page
//!    (scrolling past lazy-loaded teasers first)
//! 2. **Extracts** each article page into a structured, ordered block model
//!    in sequential batches of concurrent fetches
//! 3. **Ingests** every successfully parsed article through the content
//!    store's create-post operation
//!
//! Individual article failures never abort a run: each article is its own
//! isolation unit at both the extraction and ingestion stage, and the
//! caller receives a [`models::CrawlReport`] tagging every attempt with its
//! outcome. The single fatal failure point is navigation to the listing
//! page itself.
//!
//! ## Collaborator boundaries
//!
//! Page rendering is abstracted behind [`renderer::PageRenderer`] (headless
//! Chrome via `chromiumoxide` with the `browser` feature, plain `reqwest`
//! otherwise), the downstream store behind [`store::ContentStore`], and
//! observability behind [`events::EventSink`].

pub mod batch;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod events;
pub mod extractor;
pub mod ingest;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod renderer;
pub mod store;

pub use config::SiteProfile;
pub use errors::{CrawlError, RenderError, StoreError};
pub use models::{ArticleDetail, BatchOutcome, ContentBlock, CrawlReport, CrawlRequest};
pub use pipeline::{crawl_category, extract_article};
