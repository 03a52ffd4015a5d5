use crate::fetcher::{errors::FetchError, pipeline::process_response, types::PageResponse};
use bytes::{Bytes, BytesMut};
use reqwest::{
    Client, ClientBuilder, Response,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tracing::{debug, instrument};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const MAX_REDIRECTS: usize = 10;
const USER_AGENT: &str = "ReadstashBot/0.1 (+https://readstash.example.com)";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Outbound HTTP for scraping.
///
/// Wraps one pooled `reqwest::Client`; cloning is cheap and clones share the
/// pool, so concurrent scrapes never queue behind each other.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// `timeout` bounds the whole exchange; connecting gets at most half of it.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = ClientBuilder::new()
            .connect_timeout(timeout / 2)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { client })
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        let parsed_url = url::Url::parse(url)?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(parsed_url.scheme().to_string()));
        }

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Http { status });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        // Content-Length may be missing or wrong
        let body_bytes = read_capped(response).await?;

        debug!(
            final_url = %final_url,
            status = %status,
            bytes = body_bytes.len(),
            "fetched page"
        );

        Ok(process_response(final_url, status, body_bytes, &content_type))
    }
}

/// Buffers the body chunk by chunk, giving up as soon as it outgrows `MAX_BODY_SIZE`.
async fn read_capped(mut response: Response) -> Result<Bytes, FetchError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(FetchError::from_reqwest_error)?
    {
        let total = (body.len() + chunk.len()) as u64;
        if total > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(total));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}
