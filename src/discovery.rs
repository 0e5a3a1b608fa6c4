//! Link discovery on a category listing page.
//!
//! Opens the listing page (10 s navigation timeout by default), drives the
//! scroll driver to defeat lazy-loaded teasers, then extracts the ordered
//! list of absolute article URLs: one per listing article node, taken from
//! the nested heading-level title link.
//!
//! Normalization: an href that already carries a scheme is used as-is;
//! anything else is prefixed with the site's base origin. Results equal to
//! the bare origin are dropped (that is what an empty or missing href
//! normalizes to). No de-duplication: duplicates on the listing page are
//! preserved in order.
//!
//! Failure here is the one non-isolated failure point of the pipeline: a
//! navigation error or timeout aborts the entire crawl.

use scraper::{Html, Selector};
use tracing::{debug, info, instrument};

use crate::config::SiteProfile;
use crate::errors::{CrawlError, RenderError};
use crate::renderer::scroll::scroll_to_bottom;
use crate::renderer::PageRenderer;

/// Discover article URLs on `category_url`, in document order.
#[instrument(level = "info", skip(renderer, profile))]
pub async fn discover_links(
    renderer: &dyn PageRenderer,
    profile: &SiteProfile,
    category_url: &str,
) -> Result<Vec<String>, CrawlError> {
    let fatal = |source: RenderError| CrawlError::Discovery {
        url: category_url.to_string(),
        source,
    };

    let session = renderer
        .open(category_url, profile.listing_timeout())
        .await
        .map_err(fatal)?;

    // Scroll and snapshot, releasing the session on every exit path.
    let snapshot = async {
        scroll_to_bottom(session.as_ref(), profile).await?;
        session.html().await
    }
    .await;
    let _ = session.close().await;
    let html = snapshot.map_err(fatal)?;

    let links = extract_links(&html, profile)?;
    info!(count = links.len(), "Discovered article links");
    debug!(?links, "Listing links");
    Ok(links)
}

/// Pull article links out of listing HTML.
pub fn extract_links(html: &str, profile: &SiteProfile) -> Result<Vec<String>, CrawlError> {
    let article_selector = parse_selector(&profile.listing_article_selector)?;
    let link_selector = parse_selector(&profile.listing_title_link_selector)?;
    let origin = profile.origin()?;

    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for article in document.select(&article_selector) {
        let Some(link) = article.select(&link_selector).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let absolute = normalize_href(href, &origin);
        // An empty or bare-slash href collapses to the origin itself.
        if absolute == origin || absolute == format!("{origin}/") {
            continue;
        }
        links.push(absolute);
    }
    Ok(links)
}

fn normalize_href(href: &str, origin: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{origin}/{}", href.trim_start_matches('/'))
    }
}

fn parse_selector(raw: &str) -> Result<Selector, CrawlError> {
    Selector::parse(raw).map_err(|e| CrawlError::Profile(format!("bad selector {raw:?}: {e}")))
}
