// Test doubles for the feed pipeline.
//
// - MockScraper (TikTokScraper): HashMap-based target -> response, counts calls
// - ManualClock (Clock): time only moves when a test says so
//
// Plus small builders for raw dataset items.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use apify_client::TikTokScraperInput;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::cache::Clock;
use crate::scraper::{ScrapeFailure, TikTokScraper};
use crate::types::{RawItem, ScraperAccount};

// ---------------------------------------------------------------------------
// ManualClock
// ---------------------------------------------------------------------------

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let delta = chrono::Duration::from_std(by).unwrap();
        *self.now.lock().unwrap() += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ---------------------------------------------------------------------------
// MockScraper
// ---------------------------------------------------------------------------

/// Scraper keyed on the request target. Unregistered targets return an empty
/// dataset. Builder pattern: `.on_hashtags()`, `.on_profile()`, `.fail_with()`.
pub struct MockScraper {
    configured: bool,
    responses: HashMap<String, Result<Vec<RawItem>, ScrapeFailure>>,
    failure: Option<ScrapeFailure>,
    account: Result<ScraperAccount, ScrapeFailure>,
    calls: AtomicUsize,
    inputs: Mutex<Vec<TikTokScraperInput>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self {
            configured: true,
            responses: HashMap::new(),
            failure: None,
            account: Ok(ScraperAccount {
                id: "user-1".to_string(),
                username: Some("tester".to_string()),
            }),
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Behave as if no credential were set.
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn on_hashtags(mut self, hashtags: &[&str], items: Vec<RawItem>) -> Self {
        self.responses
            .insert(hashtag_key(hashtags.iter().copied()), Ok(items));
        self
    }

    pub fn on_profile(mut self, username: &str, items: Vec<RawItem>) -> Self {
        self.responses.insert(profile_key(username), Ok(items));
        self
    }

    pub fn fail_profile(mut self, username: &str, failure: ScrapeFailure) -> Self {
        self.responses.insert(profile_key(username), Err(failure));
        self
    }

    /// Every scrape fails with `failure`.
    pub fn fail_with(mut self, failure: ScrapeFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn account(mut self, account: Result<ScraperAccount, ScrapeFailure>) -> Self {
        self.account = account;
        self
    }

    /// Number of `scrape` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<TikTokScraperInput> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for MockScraper {
    fn default() -> Self {
        Self::new()
    }
}

fn hashtag_key<'a>(hashtags: impl Iterator<Item = &'a str>) -> String {
    let tags: Vec<&str> = hashtags.collect();
    format!("hashtags:{}", tags.join(","))
}

fn profile_key(username: &str) -> String {
    format!("profile:{username}")
}

fn input_key(input: &TikTokScraperInput) -> String {
    if let Some(profiles) = &input.profiles {
        return profile_key(&profiles.join(","));
    }
    let hashtags = input.hashtags.as_deref().unwrap_or_default();
    hashtag_key(hashtags.iter().map(String::as_str))
}

#[async_trait]
impl TikTokScraper for MockScraper {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn scrape(&self, input: &TikTokScraperInput) -> Result<Vec<RawItem>, ScrapeFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.clone());

        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.responses
            .get(&input_key(input))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn current_user(&self) -> Result<ScraperAccount, ScrapeFailure> {
        self.account.clone()
    }
}

// ---------------------------------------------------------------------------
// Raw item builders
// ---------------------------------------------------------------------------

/// A dataset record with an id, an author and a like count.
pub fn tiktok_item(id: &str, author: &str, likes: u64) -> RawItem {
    RawItem::new(json!({
        "id": id,
        "text": format!("video {id} by {author}"),
        "authorMeta": { "name": author },
        "diggCount": likes,
        "createTimeISO": "2024-01-01T00:00:00.000Z",
    }))
}

/// A profile-scrape record carrying full author metadata.
pub fn profile_item(id: &str, author: &str, fans: u64) -> RawItem {
    RawItem::new(json!({
        "id": id,
        "authorMeta": {
            "name": author,
            "signature": format!("{author}'s bio"),
            "fans": fans,
            "following": 12,
            "heart": 3400,
            "avatar": format!("https://cdn.example/{author}.jpg"),
            "verified": false,
            "privateAccount": false,
        },
        "createTimeISO": "2024-01-01T00:00:00.000Z",
    }))
}
