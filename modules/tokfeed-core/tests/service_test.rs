//! FeedService scenarios: query validation, normalization of scraped items,
//! and cache housekeeping.

use std::sync::Arc;

use tokfeed_core::testing::{profile_item, tiktok_item, ManualClock, MockScraper};
use tokfeed_core::{
    ErrorKind, FeedService, ResponseCache, ScrapeFailure, ScraperAccount, CACHE_TTL,
};

fn service(scraper: MockScraper) -> (FeedService, Arc<MockScraper>) {
    let scraper = Arc::new(scraper);
    let cache = Arc::new(ResponseCache::with_clock(
        CACHE_TTL,
        Arc::new(ManualClock::default()),
    ));
    (FeedService::new(scraper.clone(), cache), scraper)
}

fn trending_scraper() -> MockScraper {
    MockScraper::new().on_hashtags(
        &["foryou", "viral", "trending"],
        vec![tiktok_item("1", "alice", 10), tiktok_item("2", "bob", 20)],
    )
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn short_targets_never_reach_upstream() {
    let (svc, scraper) = service(MockScraper::new());

    for bad in ["", "a", "#a"] {
        let err = svc.by_hashtag(bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    for bad in ["", "z", "@z"] {
        let err = svc.by_profile(bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert_eq!(scraper.calls(), 0);
}

#[tokio::test]
async fn blank_search_is_rejected() {
    let (svc, scraper) = service(MockScraper::new());

    for bad in ["", "   ", "\n"] {
        let err = svc.search(bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert_eq!(scraper.calls(), 0);
}

#[tokio::test]
async fn validation_wins_over_missing_configuration() {
    let (svc, _) = service(MockScraper::new().unconfigured());
    let err = svc.by_hashtag("a").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trending_twice_hits_upstream_once() {
    let (svc, scraper) = service(trending_scraper());

    let first = svc.trending().await.unwrap();
    let second = svc.trending().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.count, 2);
    assert!(first.profile.is_none());
    assert_eq!(scraper.calls(), 1);
}

#[tokio::test]
async fn hashtag_videos_are_normalized() {
    let (svc, _) = service(MockScraper::new().on_hashtags(
        &["dance"],
        vec![
            tiktok_item("1", "alice", 50),
            tokfeed_core::RawItem::new(serde_json::json!({ "text": "no id" })),
        ],
    ));

    let resp = svc.by_hashtag("#dance").await.unwrap();

    assert_eq!(resp.count, 1);
    assert_eq!(resp.videos[0].id, "1");
    assert_eq!(resp.videos[0].creator.username, "alice");
    assert_eq!(resp.videos[0].likes, 50);
    assert!(resp.profile.is_none());
}

#[tokio::test]
async fn empty_hashtag_result_is_not_found() {
    let (svc, _) = service(MockScraper::new());

    let err = svc.by_hashtag("ab").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.message().contains("No content found"));
    assert_eq!(svc.cache_status().size, 0);
}

#[tokio::test]
async fn profile_query_includes_profile() {
    let (svc, _) = service(MockScraper::new().on_profile(
        "alice",
        vec![profile_item("1", "alice", 900), profile_item("2", "alice", 900)],
    ));

    let resp = svc.by_profile("@alice").await.unwrap();

    assert_eq!(resp.count, 2);
    let profile = resp.profile.unwrap();
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.followers, 900);
    assert_eq!(profile.following, 12);
    assert_eq!(profile.likes, 3400);
    assert_eq!(profile.bio, "alice's bio");
}

#[tokio::test]
async fn missing_profile_mentions_username() {
    let (svc, _) = service(
        MockScraper::new().fail_profile("ghost", ScrapeFailure::NotFound("404".into())),
    );

    let err = svc.by_profile("ghost").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.message().contains("@ghost"));
}

#[tokio::test]
async fn search_routes_by_prefix() {
    let (svc, scraper) = service(
        MockScraper::new()
            .on_profile("bob", vec![profile_item("7", "bob", 1)])
            .on_hashtags(&["cats"], vec![tiktok_item("8", "carol", 1)])
            .on_hashtags(&["funny cats"], vec![tiktok_item("9", "dan", 1)]),
    );

    let by_user = svc.search("@bob").await.unwrap();
    assert_eq!(by_user.videos[0].id, "7");
    assert!(by_user.profile.is_some());

    let by_tag = svc.search("#cats").await.unwrap();
    assert_eq!(by_tag.videos[0].id, "8");
    assert!(by_tag.profile.is_none());

    let by_text = svc.search("funny cats").await.unwrap();
    assert_eq!(by_text.videos[0].id, "9");

    assert_eq!(scraper.calls(), 3);
    assert_eq!(svc.cache_status().size, 3);
}

#[tokio::test]
async fn search_and_direct_hashtag_cache_separately() {
    let (svc, scraper) = service(
        MockScraper::new().on_hashtags(&["cats"], vec![tiktok_item("8", "carol", 1)]),
    );

    svc.by_hashtag("cats").await.unwrap();
    svc.search("#cats").await.unwrap();

    assert_eq!(scraper.calls(), 2);
}

// ---------------------------------------------------------------------------
// Cache housekeeping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clear_cache_reports_size_and_forces_misses() {
    let (svc, scraper) = service(
        trending_scraper()
            .on_hashtags(&["dance"], vec![tiktok_item("3", "carol", 1)])
            .on_profile("alice", vec![profile_item("4", "alice", 1)]),
    );

    svc.trending().await.unwrap();
    svc.by_hashtag("dance").await.unwrap();
    svc.by_profile("alice").await.unwrap();
    assert_eq!(scraper.calls(), 3);

    assert_eq!(svc.clear_cache(), 3);
    assert_eq!(svc.cache_status().size, 0);

    svc.trending().await.unwrap();
    svc.by_hashtag("dance").await.unwrap();
    svc.by_profile("alice").await.unwrap();
    assert_eq!(scraper.calls(), 6);
}

#[tokio::test]
async fn cache_status_reports_configuration() {
    let (configured, _) = service(MockScraper::new());
    let status = configured.cache_status();
    assert!(status.is_configured);
    assert_eq!(status.size, 0);
    assert_eq!(status.ttl_seconds, 300);

    let (unconfigured, _) = service(MockScraper::new().unconfigured());
    assert!(!unconfigured.cache_status().is_configured);
}

#[tokio::test]
async fn check_connection_reports_account() {
    let (svc, _) = service(MockScraper::new());
    let account = svc.check_connection().await.unwrap();
    assert_eq!(account.username.as_deref(), Some("tester"));

    let (rejected, _) = service(
        MockScraper::new().account(Err(ScrapeFailure::Unauthorized("bad token".into()))),
    );
    assert_eq!(
        rejected.check_connection().await.unwrap_err().kind(),
        ErrorKind::Auth
    );

    let (unconfigured, _) = service(MockScraper::new().unconfigured().account(Ok(
        ScraperAccount {
            id: "x".into(),
            username: None,
        },
    )));
    assert_eq!(
        unconfigured.check_connection().await.unwrap_err().kind(),
        ErrorKind::Configuration
    );
}
