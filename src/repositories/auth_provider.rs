use crate::entities::AuthProvider;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProviderRepositoryTrait: Send + Sync {
    /// Records the link once; later sign-ins through the same identity are no-ops.
    async fn save_if_absent(&self, provider: &AuthProvider) -> Result<()>;
}

#[derive(Clone)]
pub struct AuthProviderRepository {
    pool: Pool<Postgres>,
}

impl AuthProviderRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthProviderRepositoryTrait for AuthProviderRepository {
    async fn save_if_absent(&self, provider: &AuthProvider) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_providers (id, provider, provider_user_id, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (provider, provider_user_id) DO NOTHING
            "#,
        )
        .bind(provider.id)
        .bind(&provider.provider)
        .bind(&provider.provider_user_id)
        .bind(provider.user_id)
        .bind(provider.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
