use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{Article, ArticleSummary};

pub const MAX_TITLE_CHARS: usize = 255;

/// Body of both bookmark creation and full update.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookmarkPayload {
    pub title: String,
    /// Untrusted markup; sanitized before it is stored.
    pub content: String,
    pub article_link: String,
}

impl BookmarkPayload {
    /// Checks every field and returns the payload with its link trimmed,
    /// or a field-to-reason map.
    pub fn validate(mut self) -> Result<Self, BTreeMap<String, String>> {
        let mut details = BTreeMap::new();

        if self.title.trim().is_empty() {
            details.insert("title".to_string(), "is required".to_string());
        } else if self.title.chars().count() > MAX_TITLE_CHARS {
            details.insert(
                "title".to_string(),
                format!("must be at most {MAX_TITLE_CHARS} characters"),
            );
        }

        if self.content.trim().is_empty() {
            details.insert("content".to_string(), "is required".to_string());
        }

        if self.article_link.trim().is_empty() {
            details.insert("article_link".to_string(), "is required".to_string());
        } else if !is_http_url(&self.article_link) {
            details.insert(
                "article_link".to_string(),
                "must be an absolute http(s) url".to_string(),
            );
        }

        if !details.is_empty() {
            return Err(details);
        }
        self.article_link = self.article_link.trim().to_string();
        Ok(self)
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScrapeQuery {
    /// Page to preview.
    pub url: Option<String>,
}

/// Article as returned to its owner; the owner id stays internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub article_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponse {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            content: a.content,
            article_link: a.article_link,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArticleSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub article_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArticleSummary> for ArticleSummaryResponse {
    fn from(s: ArticleSummary) -> Self {
        Self {
            id: s.id,
            title: s.title,
            article_link: s.article_link,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
