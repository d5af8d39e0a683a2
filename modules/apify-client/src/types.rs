use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Input for the clockworks TikTok scraper actor.
///
/// Exactly one of `hashtags` / `profiles` is normally set; the other is left
/// out of the serialized payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TikTokScraperInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<String>>,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
    #[serde(rename = "proxyCountryCode")]
    pub proxy_country_code: String,
    #[serde(rename = "shouldDownloadVideos")]
    pub should_download_videos: bool,
    #[serde(rename = "shouldDownloadCovers")]
    pub should_download_covers: bool,
    #[serde(rename = "shouldDownloadSubtitles")]
    pub should_download_subtitles: bool,
    #[serde(rename = "shouldDownloadSlideshowImages")]
    pub should_download_slideshow_images: bool,
}

impl TikTokScraperInput {
    /// Hashtag scrape with every media download disabled.
    pub fn for_hashtags(hashtags: Vec<String>, results_per_page: u32) -> Self {
        Self {
            hashtags: Some(hashtags),
            profiles: None,
            ..Self::base(results_per_page)
        }
    }

    /// Profile scrape with every media download disabled.
    pub fn for_profiles(profiles: Vec<String>, results_per_page: u32) -> Self {
        Self {
            hashtags: None,
            profiles: Some(profiles),
            ..Self::base(results_per_page)
        }
    }

    fn base(results_per_page: u32) -> Self {
        Self {
            hashtags: None,
            profiles: None,
            results_per_page,
            proxy_country_code: "None".to_string(),
            should_download_videos: false,
            should_download_covers: false,
            should_download_subtitles: false,
            should_download_slideshow_images: false,
        }
    }
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// The account owning the API token (`GET /users/me`).
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashtag_input_omits_profiles() {
        let input = TikTokScraperInput::for_hashtags(vec!["dance".to_string()], 15);
        let json = serde_json::to_value(&input).unwrap();

        assert_eq!(json["hashtags"], serde_json::json!(["dance"]));
        assert!(json.get("profiles").is_none());
        assert_eq!(json["resultsPerPage"], 15);
        assert_eq!(json["shouldDownloadVideos"], false);
        assert_eq!(json["shouldDownloadCovers"], false);
    }

    #[test]
    fn profile_input_omits_hashtags() {
        let input = TikTokScraperInput::for_profiles(vec!["alice".to_string()], 20);
        let json = serde_json::to_value(&input).unwrap();

        assert_eq!(json["profiles"], serde_json::json!(["alice"]));
        assert!(json.get("hashtags").is_none());
        assert_eq!(json["proxyCountryCode"], "None");
    }

    #[test]
    fn run_data_parses_api_shape() {
        let json = r#"{
            "id": "run1",
            "status": "SUCCEEDED",
            "defaultDatasetId": "ds1",
            "startedAt": "2025-01-01T00:00:00Z",
            "finishedAt": null,
            "actId": "ignored"
        }"#;
        let run: RunData = serde_json::from_str(json).unwrap();
        assert_eq!(run.default_dataset_id, "ds1");
        assert!(run.started_at.is_some());
        assert!(run.finished_at.is_none());
    }
}
