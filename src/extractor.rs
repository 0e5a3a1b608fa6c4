//! Article extraction: one URL in, one structured [`ArticleDetail`] out.
//!
//! Fetching and parsing are split: [`fetch_article`] owns the page session
//! (30 s navigation timeout by default) and [`parse_article`] is a pure
//! pass over the rendered HTML, which keeps the whole block algorithm
//! testable against fixtures.
//!
//! The parse is a single left-to-right walk over the content container's
//! child `<p>` and `<figure>` nodes, maintaining one 1-based order counter
//! shared across both block kinds:
//!
//! - paragraphs of 50 characters or less are skipped entirely (no block,
//!   no summary contribution);
//! - the first qualifying paragraph seeds `summary` (first 200 characters
//!   plus an ellipsis) when no `og:description` meta was present;
//! - figures without a resolvable image URL are skipped without consuming
//!   an order slot; the first resolved image seeds `cover_image`.
//!
//! Missing DOM shape is never an error: the extractor degrades to empty
//! fields and an empty block list.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::config::SiteProfile;
use crate::errors::CrawlError;
use crate::models::{ArticleDetail, BlockKind, ContentBlock};
use crate::renderer::PageRenderer;

static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("static selector"));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:description"]"#).expect("static selector"));
static DOC_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("static selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("static selector"));
static FIGCAPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("figcaption").expect("static selector"));

/// Paragraphs at or under this many characters are boilerplate (bylines,
/// share prompts) and are dropped.
const MIN_PARAGRAPH_CHARS: usize = 50;

/// Maximum characters of body text borrowed for a fallback summary.
const SUMMARY_CHARS: usize = 200;

/// Fetch one article page and parse it.
///
/// Any navigation or evaluation error for this single URL surfaces as
/// `Err`; the batch scheduler catches it at the call site and records a
/// failed outcome instead of propagating.
#[instrument(level = "info", skip(renderer, profile, category_id, tags))]
pub async fn fetch_article(
    renderer: &dyn PageRenderer,
    profile: &SiteProfile,
    url: &str,
    category_id: Option<String>,
    tags: Option<Vec<String>>,
) -> Result<ArticleDetail, CrawlError> {
    let session = renderer.open(url, profile.detail_timeout()).await?;
    let snapshot = session.html().await;
    let _ = session.close().await;
    let html = snapshot?;

    let article = parse_article(&html, profile, category_id, tags)?;
    debug!(
        title = %article.title,
        blocks = article.blocks.len(),
        "Parsed article"
    );
    Ok(article)
}

/// Parse rendered article HTML into an [`ArticleDetail`].
pub fn parse_article(
    html: &str,
    profile: &SiteProfile,
    category_id: Option<String>,
    tags: Option<Vec<String>>,
) -> Result<ArticleDetail, CrawlError> {
    let container_selector = Selector::parse(&profile.content_container_selector).map_err(|e| {
        CrawlError::Profile(format!(
            "bad selector {:?}: {e}",
            profile.content_container_selector
        ))
    })?;

    let document = Html::parse_document(html);

    let title = meta_content(&document, &OG_TITLE)
        .or_else(|| {
            document
                .select(&DOC_TITLE)
                .next()
                .map(|t| squash_text(&t))
        })
        .unwrap_or_default();

    // og:description wins over any body-derived fallback.
    let mut summary = meta_content(&document, &OG_DESCRIPTION);
    let mut cover_image: Option<String> = None;
    let mut blocks: Vec<ContentBlock> = Vec::new();
    let mut order: u32 = 1;

    if let Some(container) = document.select(&container_selector).next() {
        for node in container.children() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            match element.value().name() {
                "p" => {
                    let text = squash_text(&element);
                    if text.chars().count() <= MIN_PARAGRAPH_CHARS {
                        continue;
                    }
                    if summary.is_none() {
                        let lead: String = text.chars().take(SUMMARY_CHARS).collect();
                        summary = Some(format!("{lead}…"));
                    }
                    blocks.push(ContentBlock {
                        kind: BlockKind::Text,
                        content: text,
                        media_url: None,
                        order,
                    });
                    order += 1;
                }
                "figure" => {
                    let Some(media_url) = figure_image_url(&element) else {
                        continue;
                    };
                    if cover_image.is_none() {
                        cover_image = Some(media_url.clone());
                    }
                    blocks.push(ContentBlock {
                        kind: BlockKind::Image,
                        content: figure_caption(&element),
                        media_url: Some(media_url),
                        order,
                    });
                    order += 1;
                }
                _ => {}
            }
        }
    }

    // Second chance: if no figure seeded the cover during the walk, take
    // the first image block's URL.
    let cover_image = second_chance_cover(cover_image, &blocks);

    Ok(ArticleDetail {
        title,
        summary: summary.unwrap_or_default(),
        cover_image,
        blocks,
        category_id,
        tags,
    })
}

/// Copy the first image block's media URL into an unset cover.
fn second_chance_cover(cover: Option<String>, blocks: &[ContentBlock]) -> Option<String> {
    cover.or_else(|| {
        blocks
            .iter()
            .find(|b| b.kind == BlockKind::Image)
            .and_then(|b| b.media_url.clone())
    })
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Image URL for a figure: `data-src` preferred over `src`.
fn figure_image_url(figure: &ElementRef) -> Option<String> {
    let img = figure.select(&IMG).next()?;
    img.value()
        .attr("data-src")
        .or_else(|| img.value().attr("src"))
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}

/// Caption for a figure: `figcaption` text, else the image `alt`, else "".
fn figure_caption(figure: &ElementRef) -> String {
    let caption = figure
        .select(&FIGCAPTION)
        .next()
        .map(|c| squash_text(&c))
        .unwrap_or_default();
    if !caption.is_empty() {
        return caption;
    }
    figure
        .select(&IMG)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Element text with runs of whitespace collapsed to single spaces.
fn squash_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::StaticRenderer;

    fn profile() -> SiteProfile {
        SiteProfile::default()
    }

    fn para(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn test_reference_fixture() {
        // og:title meta, no og:description, paragraphs of 120 and 30
        // characters, one figure with data-src.
        let html = format!(
            r#"<html><head>
                 <title>Doc Title</title>
                 <meta property="og:title" content="Meta Title">
               </head><body><article>
                 <p>{long}</p>
                 <p>{short}</p>
                 <figure>
                   <img data-src="https://cdn.example.com/a.jpg" src="https://cdn.example.com/lowres.jpg" alt="alt text">
                 </figure>
               </article></body></html>"#,
            long = para(120),
            short = para(30),
        );

        let article = parse_article(&html, &profile(), None, None).unwrap();

        assert_eq!(article.title, "Meta Title");
        assert_eq!(article.summary, format!("{}…", para(120)));
        assert_eq!(article.blocks.len(), 2);
        assert_eq!(article.blocks[0].kind, BlockKind::Text);
        assert_eq!(article.blocks[0].order, 1);
        assert_eq!(article.blocks[1].kind, BlockKind::Image);
        assert_eq!(article.blocks[1].order, 2);
        assert_eq!(
            article.cover_image.as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
    }

    #[test]
    fn test_og_description_wins_over_body_text() {
        let html = format!(
            r#"<html><head>
                 <meta property="og:description" content="The official summary">
               </head><body><article><p>{}</p></article></body></html>"#,
            para(120)
        );
        let article = parse_article(&html, &profile(), None, None).unwrap();
        assert_eq!(article.summary, "The official summary");
    }

    #[test]
    fn test_summary_truncated_at_200_chars() {
        let html = format!(
            "<html><body><article><p>{}</p></article></body></html>",
            para(250)
        );
        let article = parse_article(&html, &profile(), None, None).unwrap();
        assert_eq!(article.summary, format!("{}…", para(200)));
        // The block itself keeps the full text.
        assert_eq!(article.blocks[0].content, para(250));
    }

    #[test]
    fn test_boundary_paragraph_of_50_chars_is_skipped() {
        let html = format!(
            "<html><body><article><p>{}</p><p>{}</p></article></body></html>",
            para(50),
            para(51)
        );
        let article = parse_article(&html, &profile(), None, None).unwrap();
        assert_eq!(article.blocks.len(), 1);
        assert_eq!(article.blocks[0].content, para(51));
        assert_eq!(article.blocks[0].order, 1);
    }

    #[test]
    fn test_figure_without_image_consumes_no_order() {
        let html = format!(
            r#"<html><body><article>
                 <figure><figcaption>orphan caption</figcaption></figure>
                 <p>{}</p>
               </article></body></html>"#,
            para(80)
        );
        let article = parse_article(&html, &profile(), None, None).unwrap();
        assert_eq!(article.blocks.len(), 1);
        assert_eq!(article.blocks[0].order, 1);
        assert!(article.cover_image.is_none());
    }

    #[test]
    fn test_src_used_when_data_src_missing() {
        let html = r#"<html><body><article>
            <figure><img src="https://cdn.example.com/plain.jpg"></figure>
        </article></body></html>"#;
        let article = parse_article(html, &profile(), None, None).unwrap();
        assert_eq!(
            article.blocks[0].media_url.as_deref(),
            Some("https://cdn.example.com/plain.jpg")
        );
    }

    #[test]
    fn test_caption_falls_back_to_alt() {
        let html = r#"<html><body><article>
            <figure><img src="https://cdn.example.com/x.jpg" alt="from alt"></figure>
            <figure><figcaption>  from figcaption </figcaption><img src="https://cdn.example.com/y.jpg" alt="unused"></figure>
            <figure><img src="https://cdn.example.com/z.jpg"></figure>
        </article></body></html>"#;
        let article = parse_article(html, &profile(), None, None).unwrap();
        assert_eq!(article.blocks[0].content, "from alt");
        assert_eq!(article.blocks[1].content, "from figcaption");
        assert_eq!(article.blocks[2].content, "");
    }

    #[test]
    fn test_first_figure_seeds_cover() {
        let html = r#"<html><body><article>
            <figure><img src="https://cdn.example.com/first.jpg"></figure>
            <figure><img src="https://cdn.example.com/second.jpg"></figure>
        </article></body></html>"#;
        let article = parse_article(html, &profile(), None, None).unwrap();
        assert_eq!(
            article.cover_image.as_deref(),
            Some("https://cdn.example.com/first.jpg")
        );
    }

    #[test]
    fn test_second_chance_cover_fallback() {
        // The walk seeds the cover from the first resolved figure, so this
        // fallback only fires when the cover starts unset.
        let blocks = vec![ContentBlock {
            kind: BlockKind::Image,
            content: String::new(),
            media_url: Some("https://cdn.example.com/late.jpg".to_string()),
            order: 1,
        }];
        assert_eq!(
            second_chance_cover(None, &blocks).as_deref(),
            Some("https://cdn.example.com/late.jpg")
        );
        assert_eq!(
            second_chance_cover(Some("kept".to_string()), &blocks).as_deref(),
            Some("kept")
        );
    }

    #[test]
    fn test_missing_shape_degrades_to_defaults() {
        let article = parse_article("<html><body></body></html>", &profile(), None, None).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.summary, "");
        assert!(article.cover_image.is_none());
        assert!(article.blocks.is_empty());
    }

    #[test]
    fn test_title_falls_back_to_document_title() {
        let html = "<html><head><title>Plain Title</title></head><body></body></html>";
        let article = parse_article(html, &profile(), None, None).unwrap();
        assert_eq!(article.title, "Plain Title");
    }

    #[test]
    fn test_category_and_tags_carried_through() {
        let article = parse_article(
            "<html></html>",
            &profile(),
            Some("42".to_string()),
            Some(vec!["7".to_string()]),
        )
        .unwrap();
        assert_eq!(article.category_id.as_deref(), Some("42"));
        assert_eq!(article.tags.as_deref(), Some(&["7".to_string()][..]));
    }

    #[tokio::test]
    async fn test_fetch_article_closes_session() {
        let url = "https://news.example.com/2025/08/story";
        let html = format!(
            "<html><body><article><p>{}</p></article></body></html>",
            para(80)
        );
        let renderer = StaticRenderer::new().with_page(url, &html);

        let article = fetch_article(&renderer, &profile(), url, None, None)
            .await
            .unwrap();
        assert_eq!(article.blocks.len(), 1);
        assert_eq!(renderer.closed(), 1);
    }
}
