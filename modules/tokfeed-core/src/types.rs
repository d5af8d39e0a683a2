use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- Upstream records ---

/// An unvalidated record from the scraper dataset.
///
/// Kept as raw JSON: the upstream schema drifts between actor versions and a
/// single mistyped field must not fail the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawItem(pub Value);

impl RawItem {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a dotted path such as `authorMeta.name`. Null counts as absent.
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.0, path)
    }

    /// Nested author metadata, if the record carries any.
    pub fn author_meta(&self) -> Option<&Value> {
        self.get("authorMeta").or_else(|| self.get("author"))
    }
}

impl From<Value> for RawItem {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

pub(crate) fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

// --- Normalized output ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub username: String,
    pub avatar: String,
}

/// A TikTok video in the stable output contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub creator: Creator,
    pub description: String,
    pub soundtrack: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub plays: u64,
    pub hashtags: Vec<String>,
    pub video_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub bio: String,
    pub followers: u64,
    pub following: u64,
    pub likes: u64,
    pub avatar: String,
    pub verified: bool,
    pub private: bool,
}

/// What every feed query returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedResponse {
    pub videos: Vec<Video>,
    pub profile: Option<Profile>,
    pub count: usize,
}

impl FeedResponse {
    pub fn new(videos: Vec<Video>, profile: Option<Profile>) -> Self {
        let count = videos.len();
        Self {
            videos,
            profile,
            count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub size: usize,
    pub is_configured: bool,
    pub ttl_seconds: u64,
}

/// Identity behind the scraper credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScraperAccount {
    pub id: String,
    pub username: Option<String>,
}
