//! Downstream content-store collaborator.
//!
//! The pipeline hands successfully extracted articles to
//! [`ContentStore::create_news_post`]. Failures from the store (validation
//! or persistence) are opaque to this crate: they are counted and carried
//! as reasons, never inspected for structure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::StoreError;
use crate::models::ArticleDetail;

/// Identifier assigned by the content store to a created post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPost {
    /// The new post's id.
    pub id: String,
}

/// External content-creation operation.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Create one news post owned by `owner_id` from an extracted article.
    async fn create_news_post(
        &self,
        owner_id: &str,
        article: &ArticleDetail,
    ) -> Result<CreatedPost, StoreError>;
}

#[derive(Serialize)]
struct CreateNewsPostBody<'a> {
    owner_id: &'a str,
    #[serde(flatten)]
    article: &'a ArticleDetail,
}

/// Store client talking JSON to the internal content service.
#[derive(Debug, Clone)]
pub struct RestContentStore {
    client: Client,
    endpoint: String,
}

impl RestContentStore {
    /// `endpoint` is the base URL of the content service, e.g.
    /// `http://content.internal:8080`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ContentStore for RestContentStore {
    #[instrument(level = "debug", skip(self, article), fields(title = %article.title))]
    async fn create_news_post(
        &self,
        owner_id: &str,
        article: &ArticleDetail,
    ) -> Result<CreatedPost, StoreError> {
        let url = format!("{}/posts/news", self.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&CreateNewsPostBody { owner_id, article })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(format!("{status}: {body}")));
        }

        let created: CreatedPost = response.json().await?;
        debug!(id = %created.id, "Content store created post");
        Ok(created)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_flattens_article() {
        let article = ArticleDetail {
            title: "T".to_string(),
            summary: "S".to_string(),
            cover_image: None,
            blocks: vec![],
            category_id: None,
            tags: None,
        };
        let body = CreateNewsPostBody {
            owner_id: "owner-1",
            article: &article,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["owner_id"], "owner-1");
        assert_eq!(json["title"], "T");
        assert_eq!(json["summary"], "S");
    }
}
