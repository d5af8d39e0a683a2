// The external scraping capability, and its Apify implementation.
//
// TikTokScraper is the only seam to the outside world: the gateway never
// touches HTTP. Failures come back as a structured ScrapeFailure so the
// gateway can map them without reading error text.

use apify_client::{ApifyClient, ApifyError, TikTokScraperInput};
use async_trait::async_trait;
use thiserror::Error;

use crate::types::{RawItem, ScraperAccount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeFailure {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The scraper itself is set up wrong, e.g. an unknown actor id.
    #[error("misconfigured: {0}")]
    Misconfigured(String),

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait TikTokScraper: Send + Sync {
    /// Whether a credential is present. Never touches the network.
    fn is_configured(&self) -> bool;

    /// Run one scrape and return every dataset item it produced.
    async fn scrape(&self, input: &TikTokScraperInput) -> Result<Vec<RawItem>, ScrapeFailure>;

    /// Identity behind the credential; fails when the credential is rejected.
    async fn current_user(&self) -> Result<ScraperAccount, ScrapeFailure>;
}

// ---------------------------------------------------------------------------
// Apify
// ---------------------------------------------------------------------------

pub struct ApifyScraper {
    client: ApifyClient,
    actor_id: String,
}

impl ApifyScraper {
    pub fn new(client: ApifyClient, actor_id: impl Into<String>) -> Self {
        Self {
            client,
            actor_id: actor_id.into(),
        }
    }
}

#[async_trait]
impl TikTokScraper for ApifyScraper {
    fn is_configured(&self) -> bool {
        self.client.has_token()
    }

    async fn scrape(&self, input: &TikTokScraperInput) -> Result<Vec<RawItem>, ScrapeFailure> {
        self.client
            .scrape_tiktok::<RawItem>(&self.actor_id, input)
            .await
            .map_err(classify_apify_error)
    }

    async fn current_user(&self) -> Result<ScraperAccount, ScrapeFailure> {
        let user = self
            .client
            .current_user()
            .await
            .map_err(classify_apify_error)?;
        Ok(ScraperAccount {
            id: user.id,
            username: user.username,
        })
    }
}

/// Map an Apify failure onto a [`ScrapeFailure`], using the HTTP status when
/// there is one. Transport and parse errors carry no status and are `Other`.
pub fn classify_apify_error(err: ApifyError) -> ScrapeFailure {
    match err {
        ApifyError::MissingToken => {
            ScrapeFailure::Unauthorized("Apify API token is not set".to_string())
        }
        ApifyError::ActorNotFound(actor) => {
            ScrapeFailure::Misconfigured(format!("Apify actor {actor} does not exist"))
        }
        ApifyError::Api { status, message } => match status {
            401 | 403 => ScrapeFailure::Unauthorized(message),
            429 => ScrapeFailure::RateLimited(message),
            404 => ScrapeFailure::NotFound(message),
            _ => classify_message(&format!("status {status}: {message}")),
        },
        other @ (ApifyError::Network(_) | ApifyError::Parse(_) | ApifyError::RunFailed(_)) => {
            ScrapeFailure::Other(other.to_string())
        }
    }
}

/// Fallback classification for API errors whose status says nothing specific.
/// Matches phrases only; bare status digits also show up in run and dataset ids.
pub fn classify_message(message: &str) -> ScrapeFailure {
    let lower = message.to_lowercase();
    let detail = message.to_string();

    if lower.contains("rate limit") || lower.contains("too many requests") {
        ScrapeFailure::RateLimited(detail)
    } else if lower.contains("unauthorized")
        || lower.contains("invalid token")
        || lower.contains("authentication")
    {
        ScrapeFailure::Unauthorized(detail)
    } else if lower.contains("not found") {
        ScrapeFailure::NotFound(detail)
    } else {
        ScrapeFailure::Other(detail)
    }
}
