pub mod walker;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::fetcher::{FetchError, Fetcher};

/// Fetches a page and reduces it to restricted, tag-wrapped text.
///
/// An empty `Ok` is a legitimate answer (the page had no readable text);
/// deciding whether that is a failure is the caller's business.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract_text(&self, url: &str) -> Result<String, FetchError>;
}

/// One fetch per call, no caching and no retries.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    fetcher: Fetcher,
}

impl HtmlExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ContentExtractor for HtmlExtractor {
    #[instrument(skip(self))]
    async fn extract_text(&self, url: &str) -> Result<String, FetchError> {
        let page = self.fetcher.fetch(url).await?;
        let text = walker::extract_tagged_text(&page.body_utf8);
        debug!(
            final_url = %page.url_final,
            charset = ?page.charset,
            extracted = text.len(),
            "extracted page text"
        );
        Ok(text)
    }
}
