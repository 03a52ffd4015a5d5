use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::{Pool, Postgres};

use crate::{
    articles::BookmarkService,
    auth::{
        jwt::JwtService,
        oauth::{GoogleOauth, OauthProvider},
        state::OauthStateStore,
    },
    config::Config,
    extractor::HtmlExtractor,
    fetcher::Fetcher,
    repositories::{
        ArticleRepository, AuthProviderRepository, AuthProviderRepositoryTrait, UserRepository,
        UserRepositoryTrait,
    },
    sanitizer::HtmlSanitizer,
};

#[derive(Clone)]
pub struct AppState {
    pub bookmarks: BookmarkService,
    pub user_repo: Arc<dyn UserRepositoryTrait>,
    pub auth_provider_repo: Arc<dyn AuthProviderRepositoryTrait>,
    pub jwt: Arc<JwtService>,
    pub oauth: Arc<dyn OauthProvider>,
    pub oauth_states: OauthStateStore,
    pub config: Arc<Config>,
    pub db_pool: Pool<Postgres>,
}

impl AppState {
    /// Production wiring: Postgres stores, a pooled HTTP fetcher and Google sign-in.
    pub fn new(pool: Pool<Postgres>, config: &Config) -> anyhow::Result<Self> {
        let fetcher = Fetcher::new(config.scrape_timeout())?;
        let bookmarks = BookmarkService::new(
            Arc::new(HtmlExtractor::new(fetcher)),
            Arc::new(HtmlSanitizer::new()),
            Arc::new(ArticleRepository::new(pool.clone())),
        );

        Ok(Self {
            bookmarks,
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            auth_provider_repo: Arc::new(AuthProviderRepository::new(pool.clone())),
            jwt: Arc::new(JwtService::new(config.jwt_secret(), config.jwt_ttl_hours())),
            oauth: Arc::new(GoogleOauth::new(config.google().clone())?),
            oauth_states: OauthStateStore::default(),
            config: Arc::new(config.clone()),
            db_pool: pool,
        })
    }
}

impl FromRef<AppState> for Arc<JwtService> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
