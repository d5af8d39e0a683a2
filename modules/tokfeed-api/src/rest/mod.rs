use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::warn;

use tokfeed_core::{ErrorKind, FeedError, FeedResponse};

use crate::AppState;

// --- Query structs ---

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

// --- Errors ---

/// A feed failure rendered as `{ "error": ..., "kind": ... }`.
pub struct ApiError(FeedError);

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        ApiError(err)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::RateLimit => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::Auth | ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        ErrorKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            warn!(error = %self.0, "Feed request failed");
        }
        (
            status,
            Json(serde_json::json!({
                "error": self.0.message(),
                "kind": kind.to_string(),
            })),
        )
            .into_response()
    }
}

type ApiResult = Result<Json<FeedResponse>, ApiError>;

// --- Handlers ---

pub async fn api_trending(State(state): State<Arc<AppState>>) -> ApiResult {
    Ok(Json(state.feed.trending().await?))
}

pub async fn api_hashtag(State(state): State<Arc<AppState>>, Path(tag): Path<String>) -> ApiResult {
    Ok(Json(state.feed.by_hashtag(&tag).await?))
}

pub async fn api_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> ApiResult {
    Ok(Json(state.feed.by_profile(&username).await?))
}

pub async fn api_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> ApiResult {
    let query = params.q.unwrap_or_default();
    Ok(Json(state.feed.search(&query).await?))
}

pub async fn api_cache_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.feed.cache_status())
}

pub async fn api_cache_clear(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cleared = state.feed.clear_cache();
    Json(serde_json::json!({ "cleared": cleared }))
}

pub async fn api_apify_check(State(state): State<Arc<AppState>>) -> Response {
    match state.feed.check_connection().await {
        Ok(account) => Json(serde_json::json!({
            "ok": true,
            "account": account,
        }))
        .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
