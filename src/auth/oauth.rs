use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::GoogleOauthConfig;

pub const GOOGLE_PROVIDER: &str = "google";

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const GOOGLE_SCOPES: &str =
    "https://www.googleapis.com/auth/userinfo.email https://www.googleapis.com/auth/userinfo.profile";

#[derive(Error, Debug)]
pub enum OauthError {
    #[error("invalid provider url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("token exchange rejected with status {0}")]
    ExchangeRejected(reqwest::StatusCode),
    #[error("user info request rejected with status {0}")]
    UserInfoRejected(reqwest::StatusCode),
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Profile returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OauthUser {
    pub id: String,
    pub email: String,
    #[serde(default, alias = "given_name")]
    pub first_name: String,
    #[serde(default, alias = "family_name")]
    pub last_name: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OauthProvider: Send + Sync {
    /// Consent screen URL carrying `state`.
    fn sign_in_url(&self, state: &str) -> Result<String, OauthError>;
    /// Trades an authorization code for the signed-in user's profile.
    async fn exchange_code(&self, code: &str) -> Result<OauthUser, OauthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone)]
pub struct GoogleOauth {
    client: reqwest::Client,
    config: GoogleOauthConfig,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOauth {
    pub fn new(config: GoogleOauthConfig) -> Result<Self, OauthError> {
        Self::with_endpoints(config, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL)
    }

    /// Points the client at other endpoints; tests use a mock server.
    pub fn with_endpoints(
        config: GoogleOauthConfig,
        auth_url: &str,
        token_url: &str,
        userinfo_url: &str,
    ) -> Result<Self, OauthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            config,
            auth_url: auth_url.to_string(),
            token_url: token_url.to_string(),
            userinfo_url: userinfo_url.to_string(),
        })
    }
}

#[async_trait]
impl OauthProvider for GoogleOauth {
    fn sign_in_url(&self, state: &str) -> Result<String, OauthError> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", GOOGLE_SCOPES),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<OauthUser, OauthError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(OauthError::ExchangeRejected(response.status()));
        }
        let token: TokenResponse = response.json().await?;

        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(OauthError::UserInfoRejected(response.status()));
        }
        Ok(response.json().await?)
    }
}
