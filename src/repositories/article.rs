use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::errors::RepositoryError;
use crate::{
    entities::{Article, ArticleSummary, ArticleUpdate},
    pagination::Pagination,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepositoryTrait: Send + Sync {
    async fn save(&self, article: &Article) -> Result<(), RepositoryError>;
    /// The owner's articles, most recently updated first, plus the owner's total.
    async fn list(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> Result<(Vec<ArticleSummary>, i64), RepositoryError>;
    /// Not owner-scoped.
    async fn find_by_id(&self, id: Uuid) -> Result<Article, RepositoryError>;
    async fn update(&self, update: &ArticleUpdate) -> Result<Article, RepositoryError>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError>;
}

#[derive(Clone)]
pub struct ArticleRepository {
    pool: Pool<Postgres>,
}

impl ArticleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepositoryTrait for ArticleRepository {
    async fn save(&self, article: &Article) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO articles (id, title, content, article_link, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.article_link)
        .bind(article.user_id)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(())
    }

    async fn list(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> Result<(Vec<ArticleSummary>, i64), RepositoryError> {
        let articles = sqlx::query_as::<_, ArticleSummary>(
            r#"
            SELECT id, title, article_link, created_at, updated_at
            FROM articles
            WHERE user_id = $1
            ORDER BY updated_at DESC, created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((articles, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Article, RepositoryError> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, article_link, user_id, created_at, updated_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, update: &ArticleUpdate) -> Result<Article, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Hold the row until commit so the owner check can't go stale.
        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM articles WHERE id = $1 FOR UPDATE")
                .bind(update.id)
                .fetch_optional(&mut *tx)
                .await?;

        match owner {
            None => return Err(RepositoryError::NotFound),
            Some(owner) if owner != update.user_id => return Err(RepositoryError::Forbidden),
            Some(_) => {}
        }

        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET title = $2, content = $3, article_link = $4, updated_at = $5
            WHERE id = $1
            RETURNING id, title, content, article_link, user_id, created_at, updated_at
            "#,
        )
        .bind(update.id)
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.article_link)
        .bind(update.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        tx.commit().await?;
        Ok(article)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NothingDeleted);
        }
        Ok(())
    }
}
