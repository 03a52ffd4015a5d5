use std::sync::Arc;

use tracing::{error, instrument, warn};
use uuid::Uuid;

use super::dtos::BookmarkPayload;
use crate::{
    entities::{Article, ArticleSummary, ArticleUpdate, NewArticle},
    errors::{
        MSG_FETCH_FAILED, MSG_FORBIDDEN, MSG_NOTHING_SCRAPED, MSG_TIMEOUT, ServiceError,
    },
    extractor::ContentExtractor,
    pagination::{Meta, Pagination},
    repositories::{ArticleRepositoryTrait, RepositoryError},
    sanitizer::Sanitizer,
};

pub const MSG_URL_REQUIRED: &str = "url query parameter is required";
pub const MSG_EMPTY_CONTENT: &str = "content is empty after sanitization";

/// Orchestrates scraping, sanitizing and storing bookmarks, and owns the
/// ownership checks that the store leaves to its caller.
#[derive(Clone)]
pub struct BookmarkService {
    extractor: Arc<dyn ContentExtractor>,
    sanitizer: Arc<dyn Sanitizer>,
    articles: Arc<dyn ArticleRepositoryTrait>,
}

impl BookmarkService {
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        sanitizer: Arc<dyn Sanitizer>,
        articles: Arc<dyn ArticleRepositoryTrait>,
    ) -> Self {
        Self {
            extractor,
            sanitizer,
            articles,
        }
    }

    /// Scrapes `url` for display only. The result is not sanitized and is
    /// never stored from here.
    #[instrument(skip(self))]
    pub async fn scrape_preview(&self, url: Option<&str>) -> Result<String, ServiceError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ServiceError::bad_request(MSG_URL_REQUIRED))?;

        let text = self.extractor.extract_text(url).await.map_err(|e| {
            warn!(error = %e, "scrape failed");
            if e.is_timeout() {
                ServiceError::Timeout(MSG_TIMEOUT.to_string())
            } else {
                ServiceError::bad_request(MSG_FETCH_FAILED)
            }
        })?;

        if text.is_empty() {
            return Err(ServiceError::bad_request(MSG_NOTHING_SCRAPED));
        }
        Ok(text)
    }

    #[instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn bookmark(
        &self,
        user_id: Uuid,
        payload: BookmarkPayload,
    ) -> Result<Article, ServiceError> {
        let content = self.clean(&payload.content)?;
        let article = Article::new(NewArticle {
            title: payload.title,
            content,
            article_link: payload.article_link,
            user_id,
        });

        self.articles
            .save(&article)
            .await
            .map_err(|e| log_store_error("save", e))?;
        Ok(article)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> Result<(Vec<ArticleSummary>, Meta), ServiceError> {
        let (articles, total) = self
            .articles
            .list(user_id, pagination)
            .await
            .map_err(|e| log_store_error("list", e))?;
        Ok((articles, Meta::new(pagination, total)))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Article, ServiceError> {
        let article = self
            .articles
            .find_by_id(id)
            .await
            .map_err(|e| log_store_error("find", e))?;

        if article.user_id != user_id {
            warn!(owner = %article.user_id, "article requested by another user");
            return Err(ServiceError::Forbidden(MSG_FORBIDDEN.to_string()));
        }
        Ok(article)
    }

    /// Full overwrite of title, content and link.
    #[instrument(skip(self, payload))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: BookmarkPayload,
    ) -> Result<Article, ServiceError> {
        let content = self.clean(&payload.content)?;
        let update = ArticleUpdate::new(id, user_id, payload.title, content, payload.article_link);

        self.articles
            .update(&update)
            .await
            .map_err(|e| log_store_error("update", e))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.articles
            .delete(user_id, id)
            .await
            .map_err(|e| log_store_error("delete", e))
    }

    fn clean(&self, content: &str) -> Result<String, ServiceError> {
        let cleaned = self.sanitizer.sanitize(content);
        if cleaned.trim().is_empty() {
            return Err(ServiceError::bad_request(MSG_EMPTY_CONTENT));
        }
        Ok(cleaned)
    }
}

fn log_store_error(op: &'static str, err: RepositoryError) -> ServiceError {
    match &err {
        RepositoryError::Database(e) => error!(op, error = %e, "article store failure"),
        other => warn!(op, error = %other, "article store rejected request"),
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::{MSG_DELETE_FAILED, MSG_NOT_FOUND, MSG_TITLE_IN_USE},
        extractor::MockContentExtractor,
        fetcher::FetchError,
        repositories::article::MockArticleRepositoryTrait,
        sanitizer::HtmlSanitizer,
    };
    use mockall::predicate::eq;

    fn service(extractor: MockContentExtractor, repo: MockArticleRepositoryTrait) -> BookmarkService {
        BookmarkService::new(
            Arc::new(extractor),
            Arc::new(HtmlSanitizer::new()),
            Arc::new(repo),
        )
    }

    fn with_repo(repo: MockArticleRepositoryTrait) -> BookmarkService {
        service(MockContentExtractor::new(), repo)
    }

    fn payload(title: &str, content: &str) -> BookmarkPayload {
        BookmarkPayload {
            title: title.to_string(),
            content: content.to_string(),
            article_link: "https://example.com".to_string(),
        }
    }

    fn stored(user_id: Uuid) -> Article {
        Article::new(NewArticle {
            title: "Stored".to_string(),
            content: "<p>stored</p>".to_string(),
            article_link: "https://example.com/stored".to_string(),
            user_id,
        })
    }

    #[tokio::test]
    async fn test_preview_requires_url() {
        let svc = with_repo(MockArticleRepositoryTrait::new());
        for url in [None, Some(""), Some("   ")] {
            let err = svc.scrape_preview(url).await.unwrap_err();
            assert_eq!(err, ServiceError::bad_request(MSG_URL_REQUIRED));
        }
    }

    #[tokio::test]
    async fn test_preview_returns_raw_text() {
        let mut extractor = MockContentExtractor::new();
        extractor
            .expect_extract_text()
            .withf(|url| url == "https://example.com/a")
            .times(1)
            .returning(|_| Ok("<p>hello</p><a>x</a>".to_string()));

        let svc = service(extractor, MockArticleRepositoryTrait::new());
        let text = svc.scrape_preview(Some("https://example.com/a")).await.unwrap();
        assert_eq!(text, "<p>hello</p><a>x</a>");
    }

    #[tokio::test]
    async fn test_preview_fetch_failure_is_bad_request() {
        let mut extractor = MockContentExtractor::new();
        extractor
            .expect_extract_text()
            .returning(|_| Err(FetchError::Transport("connection refused".into())));

        let svc = service(extractor, MockArticleRepositoryTrait::new());
        let err = svc.scrape_preview(Some("http://nowhere")).await.unwrap_err();
        assert_eq!(err, ServiceError::bad_request(MSG_FETCH_FAILED));
    }

    #[tokio::test]
    async fn test_preview_timeout_is_distinct() {
        let mut extractor = MockContentExtractor::new();
        extractor
            .expect_extract_text()
            .returning(|_| Err(FetchError::Timeout));

        let svc = service(extractor, MockArticleRepositoryTrait::new());
        let err = svc.scrape_preview(Some("http://slow")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_preview_empty_extraction_is_nothing_scraped() {
        let mut extractor = MockContentExtractor::new();
        extractor.expect_extract_text().returning(|_| Ok(String::new()));

        let svc = service(extractor, MockArticleRepositoryTrait::new());
        let err = svc.scrape_preview(Some("https://example.com")).await.unwrap_err();
        assert_eq!(err, ServiceError::bad_request(MSG_NOTHING_SCRAPED));
    }

    #[tokio::test]
    async fn test_bookmark_sanitizes_content() {
        let user_id = Uuid::new_v4();
        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_save()
            .withf(move |a: &Article| {
                a.user_id == user_id
                    && a.content == r#"<a href="http://g.com" rel="nofollow">G</a><p>body</p>"#
            })
            .times(1)
            .returning(|_| Ok(()));

        let svc = with_repo(repo);
        let article = svc
            .bookmark(
                user_id,
                payload("T", r#"<a onblur="x" href="http://g.com">G</a><p>body</p>"#),
            )
            .await
            .unwrap();

        assert_eq!(article.title, "T");
        assert_eq!(
            article.content,
            r#"<a href="http://g.com" rel="nofollow">G</a><p>body</p>"#
        );
        assert_eq!(article.created_at, article.updated_at);
        assert!(!article.content.contains("onblur"));
    }

    #[tokio::test]
    async fn test_bookmark_duplicate_title() {
        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_save()
            .returning(|_| Err(RepositoryError::DuplicateTitle));

        let err = with_repo(repo)
            .bookmark(Uuid::new_v4(), payload("Taken", "<p>x</p>"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::bad_request(MSG_TITLE_IN_USE));
    }

    #[tokio::test]
    async fn test_bookmark_store_failure_is_generic() {
        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_save()
            .returning(|_| Err(RepositoryError::Database(sqlx::Error::PoolClosed)));

        let err = with_repo(repo)
            .bookmark(Uuid::new_v4(), payload("T", "<p>x</p>"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::server_error());
    }

    #[tokio::test]
    async fn test_bookmark_rejects_content_that_sanitizes_to_nothing() {
        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_save().never();

        let err = with_repo(repo)
            .bookmark(Uuid::new_v4(), payload("T", "<script>alert(1)</script>"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::bad_request(MSG_EMPTY_CONTENT));
    }

    #[tokio::test]
    async fn test_list_computes_meta() {
        let user_id = Uuid::new_v4();
        let rows: Vec<ArticleSummary> = (0..2).map(|_| (&stored(user_id)).into()).collect();
        let expected = rows.clone();

        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_list()
            .with(eq(user_id), eq(Pagination::new(1, 2)))
            .times(1)
            .returning(move |_, _| Ok((rows.clone(), 3)));

        let (articles, meta) = with_repo(repo)
            .list(user_id, Pagination::new(1, 2))
            .await
            .unwrap();
        assert_eq!(articles, expected);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.total_items, 3);
        assert_eq!(meta.current_page, 1);
    }

    #[tokio::test]
    async fn test_list_empty_is_not_an_error() {
        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_list().returning(|_, _| Ok((vec![], 0)));

        let (articles, meta) = with_repo(repo)
            .list(Uuid::new_v4(), Pagination::new(1, 20))
            .await
            .unwrap();
        assert!(articles.is_empty());
        assert_eq!(meta.total_pages, 0);
    }

    #[tokio::test]
    async fn test_get_other_users_article_is_forbidden() {
        let owner_b = Uuid::new_v4();
        let article = stored(owner_b);
        let id = article.id;

        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(article.clone()));

        let err = with_repo(repo).get(Uuid::new_v4(), id).await.unwrap_err();
        assert_eq!(err, ServiceError::Forbidden(MSG_FORBIDDEN.to_string()));
    }

    #[tokio::test]
    async fn test_get_own_article() {
        let owner = Uuid::new_v4();
        let article = stored(owner);
        let expected = article.clone();

        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_find_by_id().returning(move |_| Ok(article.clone()));

        let got = with_repo(repo).get(owner, expected.id).await.unwrap();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_find_by_id()
            .returning(|_| Err(RepositoryError::NotFound));

        let err = with_repo(repo)
            .get(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound(MSG_NOT_FOUND.to_string()));
    }

    #[tokio::test]
    async fn test_update_resanitizes_and_forwards_owner() {
        let user_id = Uuid::new_v4();
        let id = Uuid::new_v4();
        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_update()
            .withf(move |u: &ArticleUpdate| {
                u.id == id
                    && u.user_id == user_id
                    && u.title == "New"
                    && u.content == "<p>safe</p>"
            })
            .times(1)
            .returning(|u| {
                let mut article = Article::new(NewArticle {
                    title: u.title.clone(),
                    content: u.content.clone(),
                    article_link: u.article_link.clone(),
                    user_id: u.user_id,
                });
                article.id = u.id;
                article.updated_at = u.updated_at;
                Ok(article)
            });

        let article = with_repo(repo)
            .update(user_id, id, payload("New", r#"<p onclick="x()">safe</p>"#))
            .await
            .unwrap();
        assert_eq!(article.id, id);
        assert_eq!(article.content, "<p>safe</p>");
    }

    #[tokio::test]
    async fn test_update_propagates_forbidden_and_not_found() {
        let mut repo = MockArticleRepositoryTrait::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_update()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(RepositoryError::Forbidden));
        repo.expect_update()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(RepositoryError::NotFound));

        let svc = with_repo(repo);
        let err = svc
            .update(Uuid::new_v4(), Uuid::new_v4(), payload("T", "<p>x</p>"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Forbidden(MSG_FORBIDDEN.to_string()));

        let err = svc
            .update(Uuid::new_v4(), Uuid::new_v4(), payload("T", "<p>x</p>"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound(MSG_NOT_FOUND.to_string()));
    }

    #[tokio::test]
    async fn test_update_title_collision() {
        let mut repo = MockArticleRepositoryTrait::new();
        repo.expect_update()
            .returning(|_| Err(RepositoryError::DuplicateTitle));

        let err = with_repo(repo)
            .update(Uuid::new_v4(), Uuid::new_v4(), payload("Taken", "<p>x</p>"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::bad_request(MSG_TITLE_IN_USE));
    }

    #[tokio::test]
    async fn test_repeated_delete_is_an_error() {
        let user_id = Uuid::new_v4();
        let id = Uuid::new_v4();
        let mut repo = MockArticleRepositoryTrait::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_delete()
            .with(eq(user_id), eq(id))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        repo.expect_delete()
            .with(eq(user_id), eq(id))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(RepositoryError::NothingDeleted));

        let svc = with_repo(repo);
        svc.delete(user_id, id).await.unwrap();
        let err = svc.delete(user_id, id).await.unwrap_err();
        assert_eq!(err, ServiceError::bad_request(MSG_DELETE_FAILED));
    }
}
