use std::env;

use crate::error::{FeedError, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Apify
    pub apify_token: Option<String>,
    pub apify_actor: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing Apify token is not an error here: the server still starts and
    /// every feed request reports the missing credential instead.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading from an arbitrary source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let apify_token = lookup("APIFY_API_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let apify_actor = lookup("APIFY_TIKTOK_ACTOR")
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| apify_client::TIKTOK_SCRAPER.to_string());

        let web_host = lookup("API_HOST")
            .or_else(|| lookup("WEB_HOST"))
            .unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("API_PORT")
            .or_else(|| lookup("WEB_PORT"))
            .unwrap_or_else(|| "3000".to_string());
        let web_port = port
            .trim()
            .parse()
            .map_err(|_| FeedError::Configuration(format!("port must be a number, got {port:?}")))?;

        Ok(Self {
            apify_token,
            apify_actor,
            web_host,
            web_port,
        })
    }

    pub fn is_apify_configured(&self) -> bool {
        self.apify_token.is_some()
    }
}
