//! Command-line interface definitions for the crawl pipeline.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Service endpoints can be provided via flags or environment variables.

use clap::Parser;

/// Command-line arguments for one crawl (or single-article) run.
///
/// # Examples
///
/// ```sh
/// # Crawl a category and ingest every parsed article
/// newsgrab --category-path /news/tech --owner-id user-17
///
/// # Ad hoc single-article extraction, printed as JSON, nothing ingested
/// newsgrab --url https://news.example.com/2025/08/some-story
///
/// # Non-default site profile and plain-HTTP fetching
/// newsgrab -p /news/auto -o user-17 -c site.yaml --no-browser
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Category path to crawl (e.g. /news/tech)
    #[arg(short = 'p', long)]
    pub category_path: Option<String>,

    /// Identity that will own the ingested posts
    #[arg(short, long, env = "NEWSGRAB_OWNER_ID")]
    pub owner_id: Option<String>,

    /// Extract a single article URL instead of crawling (no ingestion)
    #[arg(long, conflicts_with = "category_path")]
    pub url: Option<String>,

    /// Category id stamped onto every extracted article
    #[arg(long)]
    pub category_id: Option<String>,

    /// Comma-separated tag ids stamped onto every extracted article
    #[arg(long)]
    pub tags: Option<String>,

    /// Optional path to a site profile YAML file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for JSON crawl reports
    #[arg(short, long, default_value = "./reports")]
    pub report_dir: String,

    /// Base URL of the internal content service
    #[arg(
        long,
        env = "CONTENT_SERVICE_URL",
        default_value = "http://localhost:8080"
    )]
    pub content_service_url: String,

    /// Fetch pages over plain HTTP instead of headless Chrome
    #[arg(long)]
    pub no_browser: bool,

    /// Debugging WebSocket of an already-running Chrome to reuse
    #[arg(long, env = "CHROME_DEBUG_WS_URL")]
    pub chrome_ws_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_crawl_invocation() {
        let cli = Cli::parse_from(&[
            "newsgrab",
            "--category-path",
            "/news/tech",
            "--owner-id",
            "user-17",
            "--tags",
            "1,2,3",
        ]);

        assert_eq!(cli.category_path.as_deref(), Some("/news/tech"));
        assert_eq!(cli.owner_id.as_deref(), Some("user-17"));
        assert_eq!(cli.tags.as_deref(), Some("1,2,3"));
        assert!(!cli.no_browser);
    }

    #[test]
    fn test_cli_single_url_invocation() {
        let cli = Cli::parse_from(&[
            "newsgrab",
            "--url",
            "https://news.example.com/2025/08/story",
            "--no-browser",
        ]);

        assert!(cli.category_path.is_none());
        assert!(cli.url.is_some());
        assert!(cli.no_browser);
    }

    #[test]
    fn test_cli_url_conflicts_with_category_path() {
        let result = Cli::try_parse_from(&[
            "newsgrab",
            "--url",
            "https://news.example.com/x",
            "--category-path",
            "/news/tech",
        ]);
        assert!(result.is_err());
    }
}
