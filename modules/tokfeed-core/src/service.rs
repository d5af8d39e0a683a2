use std::sync::Arc;

use tracing::info;

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::descriptor::RequestDescriptor;
use crate::error::{FeedError, Result};
use crate::gateway::FetchGateway;
use crate::normalize::{normalize_videos, profile_from_items};
use crate::scraper::{ApifyScraper, ScrapeFailure, TikTokScraper};
use crate::types::{CacheStatus, FeedResponse, ScraperAccount};

/// The four feed queries plus cache housekeeping, transport-agnostic.
pub struct FeedService {
    gateway: FetchGateway,
}

impl FeedService {
    pub fn new(scraper: Arc<dyn TikTokScraper>, cache: Arc<ResponseCache>) -> Self {
        Self {
            gateway: FetchGateway::new(scraper, cache),
        }
    }

    /// Wire the Apify scraper and a fresh cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        let client = apify_client::ApifyClient::new(config.apify_token.clone().unwrap_or_default());
        let scraper = ApifyScraper::new(client, config.apify_actor.clone());
        Self::new(Arc::new(scraper), Arc::new(ResponseCache::new()))
    }

    pub async fn trending(&self) -> Result<FeedResponse> {
        self.run(RequestDescriptor::trending()).await
    }

    pub async fn by_hashtag(&self, tag: &str) -> Result<FeedResponse> {
        self.run(RequestDescriptor::hashtag(tag)?).await
    }

    pub async fn by_profile(&self, username: &str) -> Result<FeedResponse> {
        self.run(RequestDescriptor::profile(username)?).await
    }

    pub async fn search(&self, query: &str) -> Result<FeedResponse> {
        self.run(RequestDescriptor::search(query)?).await
    }

    /// Empty the cache, returning how many entries it held.
    pub fn clear_cache(&self) -> usize {
        let cleared = self.gateway.cache().clear();
        info!(cleared, "Cache cleared");
        cleared
    }

    pub fn cache_status(&self) -> CacheStatus {
        let cache = self.gateway.cache();
        CacheStatus {
            size: cache.len(),
            is_configured: self.gateway.scraper().is_configured(),
            ttl_seconds: cache.ttl().as_secs(),
        }
    }

    /// Verify the credential against the upstream account endpoint.
    pub async fn check_connection(&self) -> Result<ScraperAccount> {
        let scraper = self.gateway.scraper();
        if !scraper.is_configured() {
            return Err(FeedError::Configuration(
                "Apify API token is not configured".to_string(),
            ));
        }
        scraper
            .current_user()
            .await
            .map_err(|failure| match failure {
                ScrapeFailure::Unauthorized(detail) => FeedError::Auth(detail),
                ScrapeFailure::RateLimited(detail) => FeedError::RateLimit(detail),
                ScrapeFailure::Misconfigured(detail) => FeedError::Configuration(detail),
                other => FeedError::Upstream(other.to_string()),
            })
    }

    async fn run(&self, descriptor: RequestDescriptor) -> Result<FeedResponse> {
        let items = self.gateway.fetch(&descriptor).await?;
        let videos = normalize_videos(&items);
        let profile = if descriptor.target.is_profile() {
            profile_from_items(&items)
        } else {
            None
        };
        info!(key = %descriptor.cache_key, count = videos.len(), "Feed served");
        Ok(FeedResponse::new(videos, profile))
    }
}
