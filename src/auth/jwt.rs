use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const CLOCK_SKEW_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("token rejected: {0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),
}

/// HS256 session tokens handed out after sign-in. The subject is the user id.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        let mut validation = Validation::default();
        validation.leeway = CLOCK_SKEW_SECS;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn generate_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        let issued_at = Utc::now();
        let claims = Claims {
            sub: user_id,
            exp: (issued_at + self.ttl).timestamp(),
            iat: issued_at.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Sign)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Rejected)
    }

    pub fn user_id(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify_token(token).map(|claims| claims.sub)
    }
}
