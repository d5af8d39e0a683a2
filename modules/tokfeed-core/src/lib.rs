pub mod cache;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod scraper;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod types;

pub use cache::{Clock, ResponseCache, SystemClock, CACHE_TTL};
pub use config::Config;
pub use descriptor::{CacheKey, RequestDescriptor, Target};
pub use error::{ErrorKind, FeedError, Result};
pub use gateway::FetchGateway;
pub use normalize::{normalize_profile, normalize_videos, normalize_videos_at};
pub use scraper::{ApifyScraper, ScrapeFailure, TikTokScraper};
pub use service::FeedService;
pub use types::*;
