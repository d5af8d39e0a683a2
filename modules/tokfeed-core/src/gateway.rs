use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::descriptor::{CacheKey, RequestDescriptor, Target};
use crate::error::{FeedError, Result};
use crate::scraper::{ScrapeFailure, TikTokScraper};
use crate::types::RawItem;

/// Memoizing front for the scraper.
///
/// Concurrent misses on the same key are not coalesced: each one calls
/// upstream and writes the cache, last write wins.
pub struct FetchGateway {
    scraper: Arc<dyn TikTokScraper>,
    cache: Arc<ResponseCache>,
}

impl FetchGateway {
    pub fn new(scraper: Arc<dyn TikTokScraper>, cache: Arc<ResponseCache>) -> Self {
        Self { scraper, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn scraper(&self) -> &dyn TikTokScraper {
        self.scraper.as_ref()
    }

    /// Cached items for the descriptor if fresh, otherwise a new scrape.
    pub async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<Vec<RawItem>> {
        self.fetch_with_key(descriptor, Some(&descriptor.cache_key))
            .await
    }

    /// Always scrape; neither reads nor writes the cache.
    pub async fn fetch_uncached(&self, descriptor: &RequestDescriptor) -> Result<Vec<RawItem>> {
        self.fetch_with_key(descriptor, None).await
    }

    async fn fetch_with_key(
        &self,
        descriptor: &RequestDescriptor,
        cache_key: Option<&CacheKey>,
    ) -> Result<Vec<RawItem>> {
        if !self.scraper.is_configured() {
            return Err(FeedError::Configuration(
                "Apify API token is not configured".to_string(),
            ));
        }

        if let Some(key) = cache_key {
            if let Some(items) = self.cache.get(key) {
                debug!(key = %key, count = items.len(), "Cache hit");
                return Ok(items);
            }
        }

        info!(query = ?descriptor.target, "Cache miss, scraping");
        let items = self
            .scraper
            .scrape(&descriptor.input)
            .await
            .map_err(|failure| classify_failure(failure, &descriptor.target))?;

        if items.is_empty() {
            warn!(query = ?descriptor.target, "Scrape returned no items");
            return Err(FeedError::NotFound(descriptor.target.not_found_message()));
        }

        if let Some(key) = cache_key {
            self.cache.insert(key.clone(), items.clone());
            info!(key = %key, count = items.len(), "Cached scrape result");
        }

        Ok(items)
    }
}

fn classify_failure(failure: ScrapeFailure, target: &Target) -> FeedError {
    warn!(error = %failure, query = ?target, "Scrape failed");
    match failure {
        ScrapeFailure::Unauthorized(detail) => {
            FeedError::Auth(format!("Apify rejected the API token: {detail}"))
        }
        ScrapeFailure::RateLimited(detail) => {
            FeedError::RateLimit(format!("Apify rate limit reached: {detail}"))
        }
        ScrapeFailure::NotFound(_) => FeedError::NotFound(target.not_found_message()),
        ScrapeFailure::Misconfigured(detail) => FeedError::Configuration(detail),
        ScrapeFailure::Other(detail) => FeedError::Upstream(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_failure_uses_target_detail() {
        let err = classify_failure(
            ScrapeFailure::NotFound("404".into()),
            &Target::Profile("alice".into()),
        );
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
        assert!(err.message().contains("@alice"));
    }

    #[test]
    fn misconfigured_scraper_is_configuration_not_missing_content() {
        let err = classify_failure(
            ScrapeFailure::Misconfigured("Apify actor me~typo does not exist".into()),
            &Target::Hashtag("dance".into()),
        );
        assert_eq!(
            err,
            FeedError::Configuration("Apify actor me~typo does not exist".into())
        );
    }

    #[test]
    fn other_failure_wraps_detail() {
        let err = classify_failure(ScrapeFailure::Other("boom".into()), &Target::Trending);
        assert_eq!(err, FeedError::Upstream("boom".into()));
    }

    #[test]
    fn auth_and_rate_limit_keep_their_kind() {
        assert_eq!(
            classify_failure(ScrapeFailure::Unauthorized("x".into()), &Target::Trending).kind(),
            crate::ErrorKind::Auth
        );
        assert_eq!(
            classify_failure(ScrapeFailure::RateLimited("x".into()), &Target::Trending).kind(),
            crate::ErrorKind::RateLimit
        );
    }
}
