pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{RunData, TikTokScraperInput, UserInfo};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for clockworks/tiktok-scraper.
pub const TIKTOK_SCRAPER: &str = "clockworks~tiktok-scraper";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Whether a non-blank token was supplied. Says nothing about its validity.
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn start_run<I: Serialize>(&self, actor_id: &str, input: &I) -> Result<RunData> {
        if !self.has_token() {
            return Err(ApifyError::MissingToken);
        }

        let url = format!("{}/acts/{}/runs", BASE_URL, actor_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        // No run exists yet, so a 404 here can only mean the actor id.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApifyError::ActorNotFound(actor_id.to_string()));
        }

        let api_resp: ApiResponse<RunData> = Self::read_json(resp).await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", BASE_URL, run_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let api_resp: ApiResponse<RunData> = Self::read_json(resp).await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed(api_resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json", BASE_URL, dataset_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::read_json(resp).await
    }

    /// Run an actor end-to-end: start run, poll, fetch dataset items.
    pub async fn run_actor<I: Serialize, T: DeserializeOwned>(
        &self,
        actor_id: &str,
        input: &I,
    ) -> Result<Vec<T>> {
        tracing::info!(actor_id, "Starting Apify actor run");

        let run = self.start_run(actor_id, input).await?;
        tracing::info!(run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        let items: Vec<T> = self
            .get_dataset_items(&completed.default_dataset_id)
            .await?;
        tracing::info!(count = items.len(), "Fetched dataset items");

        Ok(items)
    }

    /// Scrape TikTok with the clockworks actor (or a compatible fork).
    pub async fn scrape_tiktok<T: DeserializeOwned>(
        &self,
        actor_id: &str,
        input: &TikTokScraperInput,
    ) -> Result<Vec<T>> {
        tracing::info!(
            hashtags = ?input.hashtags,
            profiles = ?input.profiles,
            limit = input.results_per_page,
            "Starting TikTok scrape"
        );
        self.run_actor(actor_id, input).await
    }

    /// Look up the account that owns the token. Fails with a 401 for a bad token.
    pub async fn current_user(&self) -> Result<UserInfo> {
        if !self.has_token() {
            return Err(ApifyError::MissingToken);
        }

        let url = format!("{}/users/me", BASE_URL);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let api_resp: ApiResponse<UserInfo> = Self::read_json(resp).await?;
        Ok(api_resp.data)
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
