use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tokfeed_core::{Config, FeedService};

mod rest;

pub struct AppState {
    pub feed: FeedService,
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Feeds
        .route("/api/trending", get(rest::api_trending))
        .route("/api/hashtag/{tag}", get(rest::api_hashtag))
        .route("/api/profile/{username}", get(rest::api_profile))
        .route("/api/search", get(rest::api_search))
        // Operations
        .route("/api/cache/status", get(rest::api_cache_status))
        .route("/api/cache/clear", post(rest::api_cache_clear))
        .route("/api/apify/check", get(rest::api_apify_check))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // No browser caching
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("tokfeed=info".parse()?)
        .add_directive("apify_client=info".parse()?);
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = Config::from_env()?;
    if !config.is_apify_configured() {
        warn!("APIFY_API_TOKEN is not set; feed requests will fail until it is");
    }

    let state = Arc::new(AppState {
        feed: FeedService::from_config(&config),
    });

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("tokfeed API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
