use chrono::{DateTime, SubsecRound, Utc};
use regex::Regex;
use sqlx::FromRow;
use std::sync::LazyLock;
use thiserror::Error;
use uuid::Uuid;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
});

/// Postgres keeps microseconds; trimming up front means the value we hand
/// back to callers is the value a later read returns.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// --- Tables ---

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid email address")]
pub struct InvalidEmail;

impl User {
    pub fn new(arg: NewUser) -> Result<Self, InvalidEmail> {
        if !EMAIL_REGEX.is_match(&arg.email) {
            return Err(InvalidEmail);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            email: arg.email,
            first_name: arg.first_name,
            last_name: arg.last_name,
            created_at: now(),
        })
    }
}

/// Link between a local user and an identity at an OAuth provider.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AuthProvider {
    pub id: Uuid,
    pub provider: String,
    pub provider_user_id: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl AuthProvider {
    pub fn new(provider: &str, provider_user_id: &str, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider: provider.to_string(),
            provider_user_id: provider_user_id.to_string(),
            user_id,
            created_at: now(),
        }
    }
}

/// A bookmarked article. `content` is always sanitized markup.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String, // unique across all users
    pub content: String,
    pub article_link: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub article_link: String,
    pub user_id: Uuid,
}

impl Article {
    pub fn new(arg: NewArticle) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4(),
            title: arg.title,
            content: arg.content,
            article_link: arg.article_link,
            user_id: arg.user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// List rows: everything but the content and the owner.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ArticleSummary {
    pub id: Uuid,
    pub title: String,
    pub article_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            article_link: article.article_link.clone(),
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// Full overwrite of an article's editable fields, on behalf of `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleUpdate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub article_link: String,
    pub updated_at: DateTime<Utc>,
}

impl ArticleUpdate {
    pub fn new(id: Uuid, user_id: Uuid, title: String, content: String, article_link: String) -> Self {
        Self {
            id,
            user_id,
            title,
            content,
            article_link,
            updated_at: now(),
        }
    }
}
