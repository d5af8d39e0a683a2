//! Maps raw scraper records onto [`Video`] and [`Profile`].
//!
//! Nothing here fails. Missing or mistyped fields fall back to defaults; the
//! only thing that removes a record is a missing id.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{lookup, Creator, Profile, RawItem, Video};

pub const UNKNOWN_USERNAME: &str = "unknown";
pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/100x100.png?text=TikTok";
pub const NO_DESCRIPTION: &str = "No description available";
pub const ORIGINAL_SOUND: &str = "Original Sound";

/// Normalize with the current time as the `createdAt` fallback.
pub fn normalize_videos(items: &[RawItem]) -> Vec<Video> {
    normalize_videos_at(items, Utc::now())
}

/// Normalize using `fallback_time` for records without a creation time.
pub fn normalize_videos_at(items: &[RawItem], fallback_time: DateTime<Utc>) -> Vec<Video> {
    items
        .iter()
        .filter_map(|item| normalize_video(item, fallback_time))
        .collect()
}

fn normalize_video(item: &RawItem, fallback_time: DateTime<Utc>) -> Option<Video> {
    let id = item.get("id").and_then(id_string)?;

    let username = first_string(
        item,
        &[
            "authorMeta.name",
            "authorMeta.uniqueId",
            "author.uniqueId",
            "author.name",
        ],
    )
    .unwrap_or_else(|| UNKNOWN_USERNAME.to_string());

    let avatar = first_string(item, &["authorMeta.avatar", "author.avatarThumb"])
        .unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string());

    let video_url = first_string(item, &["webVideoUrl", "videoUrl"])
        .unwrap_or_else(|| format!("https://www.tiktok.com/@{username}/video/{id}"));

    Some(Video {
        description: first_string(item, &["text", "desc", "description"])
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        soundtrack: first_string(item, &["musicMeta.musicName", "music.title"])
            .unwrap_or_else(|| ORIGINAL_SOUND.to_string()),
        likes: first_count(item, &["diggCount", "stats.diggCount"]),
        comments: first_count(item, &["commentCount", "stats.commentCount"]),
        shares: first_count(item, &["shareCount", "stats.shareCount"]),
        plays: first_count(item, &["playCount", "stats.playCount"]),
        hashtags: hashtags(item),
        created_at: created_at(item).unwrap_or(fallback_time),
        creator: Creator { username, avatar },
        video_url,
        id,
    })
}

/// Profile from author metadata. `None` in, `None` out.
pub fn normalize_profile(author_meta: Option<&Value>) -> Option<Profile> {
    let meta = author_meta?;
    let string = |keys: &[&str]| keys.iter().find_map(|k| lookup(meta, k).and_then(text));
    let counter = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| lookup(meta, k))
            .map(count)
            .unwrap_or(0)
    };
    let flag = |key: &str| lookup(meta, key).and_then(Value::as_bool).unwrap_or(false);

    Some(Profile {
        username: string(&["name", "uniqueId"]).unwrap_or_else(|| UNKNOWN_USERNAME.to_string()),
        bio: string(&["signature"]).unwrap_or_default(),
        followers: counter(&["fans", "followers"]),
        following: counter(&["following", "followingCount"]),
        likes: counter(&["heart", "likes"]),
        avatar: string(&["avatar"]).unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string()),
        verified: flag("verified"),
        private: flag("privateAccount"),
    })
}

/// Profile for a result set: author metadata of the first record that has any.
pub fn profile_from_items(items: &[RawItem]) -> Option<Profile> {
    normalize_profile(items.iter().find_map(RawItem::author_meta))
}

// --- Field helpers ---

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn first_string(item: &RawItem, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|p| item.get(p).and_then(text))
}

/// The first path that is present decides, even if it holds junk.
fn first_count(item: &RawItem, paths: &[&str]) -> u64 {
    paths
        .iter()
        .find_map(|p| item.get(p))
        .map(count)
        .unwrap_or(0)
}

fn count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

fn hashtags(item: &RawItem) -> Vec<String> {
    item.get("hashtags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| lookup(tag, "name").and_then(text))
                .collect()
        })
        .unwrap_or_default()
}

fn created_at(item: &RawItem) -> Option<DateTime<Utc>> {
    if let Some(iso) = item.get("createTimeISO").and_then(Value::as_str) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let secs = match item.get("createTime")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    DateTime::from_timestamp(secs, 0)
}
