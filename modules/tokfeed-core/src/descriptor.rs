//! Turns user-facing queries into scraper requests and cache keys.
//!
//! Everything here is pure. Invalid input is rejected with
//! [`FeedError::Validation`] before the cache or the network is touched.

use std::fmt;

use apify_client::TikTokScraperInput;

use crate::error::{FeedError, Result};

/// Hashtags scraped for the trending feed.
pub const TRENDING_HASHTAGS: [&str; 3] = ["foryou", "viral", "trending"];

/// Results per page for hashtag and search scrapes.
pub const DEFAULT_RESULTS: u32 = 15;

/// Results per page for profile scrapes.
pub const PROFILE_RESULTS: u32 = 20;

const MIN_TARGET_LEN: usize = 2;

/// Deterministic identity of a memoizable query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    fn new(prefix: &str, value: &str) -> Self {
        Self(format!("{prefix}{value}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the upstream scrape is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Trending,
    Hashtag(String),
    Profile(String),
    /// Free text sent upstream as if it were a hashtag.
    Keyword(String),
}

impl Target {
    pub fn is_profile(&self) -> bool {
        matches!(self, Target::Profile(_))
    }

    /// Message used when the scrape comes back empty.
    pub fn not_found_message(&self) -> String {
        match self {
            Target::Trending => "No trending content found".to_string(),
            Target::Hashtag(tag) => format!("No content found for #{tag}"),
            Target::Profile(username) => {
                format!("User @{username} not found, is private, or has no public videos")
            }
            Target::Keyword(text) => format!("No content found for \"{text}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub target: Target,
    pub input: TikTokScraperInput,
    pub cache_key: CacheKey,
}

impl RequestDescriptor {
    pub fn trending() -> Self {
        let hashtags = TRENDING_HASHTAGS.iter().map(|t| t.to_string()).collect();
        Self {
            target: Target::Trending,
            input: TikTokScraperInput::for_hashtags(hashtags, DEFAULT_RESULTS),
            cache_key: CacheKey("trending".to_string()),
        }
    }

    pub fn hashtag(tag: &str) -> Result<Self> {
        let tag = strip_sigil(tag, '#');
        if tag.chars().count() < MIN_TARGET_LEN {
            return Err(FeedError::Validation(
                "Hashtag must be at least 2 characters".to_string(),
            ));
        }
        Ok(Self::hashtag_request(tag, "hashtag_", Target::Hashtag(tag.to_string())))
    }

    pub fn profile(username: &str) -> Result<Self> {
        let username = strip_sigil(username, '@');
        if username.chars().count() < MIN_TARGET_LEN {
            return Err(FeedError::Validation(
                "Username must be at least 2 characters".to_string(),
            ));
        }
        Ok(Self::profile_request(username, "profile_"))
    }

    /// Classify a search box query: `#tag`, `@user`, or literal keyword text.
    pub fn search(query: &str) -> Result<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FeedError::Validation("Search query is required".to_string()));
        }

        if let Some(rest) = query.strip_prefix('#') {
            let tag = rest.trim();
            if tag.is_empty() {
                return Err(FeedError::Validation("Hashtag search needs a tag".to_string()));
            }
            return Ok(Self::hashtag_request(
                tag,
                "search_hashtag_",
                Target::Hashtag(tag.to_string()),
            ));
        }

        if let Some(rest) = query.strip_prefix('@') {
            let username = rest.trim();
            if username.is_empty() {
                return Err(FeedError::Validation(
                    "Profile search needs a username".to_string(),
                ));
            }
            return Ok(Self::profile_request(username, "search_profile_"));
        }

        Ok(Self::hashtag_request(
            query,
            "search_keyword_",
            Target::Keyword(query.to_string()),
        ))
    }

    fn hashtag_request(tag: &str, key_prefix: &str, target: Target) -> Self {
        Self {
            target,
            input: TikTokScraperInput::for_hashtags(vec![tag.to_string()], DEFAULT_RESULTS),
            cache_key: CacheKey::new(key_prefix, tag),
        }
    }

    fn profile_request(username: &str, key_prefix: &str) -> Self {
        Self {
            target: Target::Profile(username.to_string()),
            input: TikTokScraperInput::for_profiles(vec![username.to_string()], PROFILE_RESULTS),
            cache_key: CacheKey::new(key_prefix, username),
        }
    }
}

fn strip_sigil(raw: &str, sigil: char) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix(sigil).unwrap_or(trimmed).trim()
}
