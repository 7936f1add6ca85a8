//! End-to-end facade tests over scripted relays.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dramabox_catalog::{CatalogApi, EndpointScheme, PagedScheme, QueryScheme};
use dramabox_core::{CatalogError, CatalogSource, FailureKind, FeedKind, StreamKind};
use dramabox_fetch::{
    FallbackFetcher, FetchContext, RelayError, RelayKind, RelayStrategy, RetryPolicy,
};
use serde_json::{Value, json};

const BASE: &str = "https://api.test";

// ============================================================================
// Scripted Relays
// ============================================================================

/// Answers from a fixed table of target URLs; anything else is a 404.
struct ScriptedRelay {
    id: &'static str,
    responses: HashMap<String, Value>,
    fail_first: usize,
    calls: Arc<AtomicUsize>,
}

impl ScriptedRelay {
    fn new(id: &'static str) -> Self {
        Self {
            id,
            responses: HashMap::new(),
            fail_first: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(id: &'static str) -> Self {
        Self {
            fail_first: usize::MAX,
            ..Self::new(id)
        }
    }

    fn respond(mut self, path: &str, payload: Value) -> Self {
        self.responses.insert(format!("{BASE}{path}"), payload);
        self
    }

    fn fail_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl RelayStrategy for ScriptedRelay {
    fn id(&self) -> &str {
        self.id
    }

    fn kind(&self) -> RelayKind {
        RelayKind::Direct
    }

    fn relay_url(&self, target_url: &str) -> String {
        target_url.to_string()
    }

    fn unwrap_body(&self, _body: &str) -> Result<Value, RelayError> {
        Err(RelayError::Decode("scripted relays never read a body".to_string()))
    }

    async fn fetch_raw(&self, _ctx: &FetchContext, target_url: &str) -> Result<Value, RelayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first {
            return Err(RelayError::HttpStatus(503));
        }
        self.responses
            .get(target_url)
            .cloned()
            .ok_or(RelayError::HttpStatus(404))
    }
}

fn api(scheme: impl EndpointScheme + 'static, relays: Vec<ScriptedRelay>) -> CatalogApi {
    let strategies: Vec<Box<dyn RelayStrategy>> = relays
        .into_iter()
        .map(|r| Box::new(r) as Box<dyn RelayStrategy>)
        .collect();
    let fetcher = FallbackFetcher::with_strategies(BASE, strategies, FetchContext::new());
    CatalogApi::new(fetcher, Box::new(scheme)).with_retry(RetryPolicy::no_retry())
}

fn book(id: &str) -> Value {
    json!({"bookId": id, "bookName": format!("Drama {id}"), "cover": format!("https://img/{id}.jpg")})
}

// ============================================================================
// Feeds
// ============================================================================

#[tokio::test]
async fn test_third_relay_rescues_feed() {
    let payload = json!({"success": true, "data": {"list": [book("1")], "isMore": true}});
    let a = ScriptedRelay::failing("a");
    let b = ScriptedRelay::failing("b");
    let c = ScriptedRelay::new("c").respond("/foryou/1", payload);
    let (a_calls, b_calls, c_calls) = (a.counter(), b.counter(), c.counter());

    let page = api(PagedScheme, vec![a, b, c]).list_for_you(1).await.unwrap();

    assert_eq!(page.len(), 1);
    assert!(page.has_more);
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_all_relays_failing_is_network_exhausted() {
    let api = api(
        PagedScheme,
        vec![ScriptedRelay::failing("a"), ScriptedRelay::failing("b"), ScriptedRelay::failing("c")],
    );

    let err = api.list_trending(1).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NetworkExhausted);
    assert!(err.is_transient());
    match err {
        CatalogError::NetworkExhausted { attempts, .. } => assert_eq!(attempts.len(), 3),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_feed_paths_and_tag_cards() {
    let payload = json!({"data": {"list": [
        book("p1"),
        {"cardType": 3, "tagCardVo": {"tagBooks": [book("n1"), book("n2"), book("n3")]}},
        book("p2"),
    ], "isMore": false}});
    let relay = ScriptedRelay::new("r").respond("/rank/2", payload);

    let page = api(PagedScheme, vec![relay])
        .list_feed(FeedKind::Trending, 2)
        .await
        .unwrap();

    let ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "n1", "n2", "n3", "p2"]);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_page_zero_rejected() {
    let relay = ScriptedRelay::new("r");
    let calls = relay.counter();
    let err = api(PagedScheme, vec![relay]).list_new(0).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::InvalidArgument);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_query_scheme_is_single_page() {
    let relay = ScriptedRelay::new("r").respond("/latest", json!([book("a"), book("b")]));
    let calls = relay.counter();
    let api = api(QueryScheme, vec![relay]);

    let first = api.list_new(1).await.unwrap();
    assert_eq!(first.len(), 2);
    assert!(!first.has_more);

    let second = api.list_new(2).await.unwrap();
    assert!(second.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unrecognized_listing_is_not_an_empty_result() {
    let relay = ScriptedRelay::new("r")
        .respond("/foryou/1", json!({"success": false, "data": null}))
        .respond("/foryou/2", json!({"success": true, "data": {}}))
        .respond("/search/love/1", json!({"data": {"items": 3}}));
    let api = api(PagedScheme, vec![relay]);

    let err = api.list_for_you(1).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);

    let later = api.list_for_you(2).await.unwrap();
    assert!(later.is_empty());
    assert!(!later.has_more);

    let err = api.search("love", 1).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[tokio::test]
async fn test_retry_policy_recovers() {
    let relay = ScriptedRelay::new("r")
        .respond("/foryou/1", json!({"data": {"list": [book("1")]}}))
        .fail_first(1);
    let calls = relay.counter();

    let api = api(PagedScheme, vec![relay])
        .with_retry(RetryPolicy::new(2).with_base_delay(Duration::ZERO));

    assert_eq!(api.list_for_you(1).await.unwrap().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Search & Suggest
// ============================================================================

#[tokio::test]
async fn test_blank_search_never_hits_network() {
    let relay = ScriptedRelay::new("r");
    let calls = relay.counter();
    let api = api(PagedScheme, vec![relay]);

    for keyword in ["", "   ", "\t\n"] {
        let err = api.search(keyword, 1).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidArgument);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_encodes_keyword() {
    let relay = ScriptedRelay::new("r").respond(
        "/search/ceo%20wife/1",
        json!({"data": {"list": [book("s1")], "isMore": true}}),
    );

    let page = api(PagedScheme, vec![relay]).search(" ceo wife ", 1).await.unwrap();
    assert_eq!(page.items[0].id, "s1");
    assert!(page.has_more);
}

#[tokio::test]
async fn test_suggest_reads_suggest_list() {
    let relay = ScriptedRelay::new("r")
        .respond("/suggest/lo", json!({"success": true, "data": {"suggestList": [book("x"), book("y")]}}));

    let items = api(PagedScheme, vec![relay]).suggest("lo").await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_blank_suggest_is_empty() {
    let relay = ScriptedRelay::new("r");
    let calls = relay.counter();
    let items = api(PagedScheme, vec![relay]).suggest(" ").await.unwrap();
    assert!(items.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_popular_searches() {
    let relay = ScriptedRelay::new("r").respond("/populersearch", json!([book("p")]));
    let items = api(QueryScheme, vec![relay]).list_popular_searches().await.unwrap();
    assert_eq!(items[0].id, "p");
}

// ============================================================================
// Episodes & Streams
// ============================================================================

#[tokio::test]
async fn test_zero_episodes_is_success() {
    let relay = ScriptedRelay::new("r").respond("/chapters/42", json!({"data": {"chapterList": []}}));
    let episodes = api(PagedScheme, vec![relay]).list_episodes("42").await.unwrap();
    assert!(episodes.is_empty());
}

#[tokio::test]
async fn test_missing_chapter_list_is_not_found() {
    let relay = ScriptedRelay::new("r").respond("/chapters/42", json!({"success": true, "data": {}}));
    let err = api(PagedScheme, vec![relay]).list_episodes("42").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[tokio::test]
async fn test_resolve_default_quality() {
    let relay = ScriptedRelay::new("r").respond(
        "/watch/42/0",
        json!({"success": true, "data": {"qualities": [
            {"quality": 480, "videoPath": "a", "isDefault": 0},
            {"quality": 720, "videoPath": "b", "isDefault": 1},
        ]}}),
    );
    let target = api(PagedScheme, vec![relay]).resolve_stream_target("42", 0).await.unwrap();
    assert_eq!(target.stream_url, "b");
}

#[tokio::test]
async fn test_resolve_top_level_video_url() {
    let relay = ScriptedRelay::new("r").respond("/watch/42/1", json!({"data": {"videoUrl": "c"}}));
    let target = api(PagedScheme, vec![relay]).resolve_stream_target("42", 1).await.unwrap();
    assert_eq!(target.stream_url, "c");
}

#[tokio::test]
async fn test_resolve_without_any_url() {
    let relay = ScriptedRelay::new("r").respond("/watch/42/1", json!({"data": {"cover": "x"}}));
    let err = api(PagedScheme, vec![relay]).resolve_stream_target("42", 1).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoPlayableStream);
    assert_eq!(err.user_message(), "Unable to play this episode. It might be locked or unavailable.");
}

#[tokio::test]
async fn test_query_scheme_watch_picks_chapter() {
    let listing = json!([
        {"chapterId": "c0", "chapterIndex": 0, "videoUrl": "https://cdn/0.mp4"},
        {"chapterId": "c1", "chapterIndex": 1, "cover": "https://img/1.jpg", "cdnList": [
            {"isDefault": 1, "videoPathList": [{"quality": 720, "videoPath": "https://cdn/1.m3u8", "isDefault": 1}]}
        ]},
    ]);
    let relay = ScriptedRelay::new("r").respond("/stream?bookId=42", listing);
    let api = api(QueryScheme, vec![relay]);

    let episodes = api.list_episodes("42").await.unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[1].quality_variants.len(), 1);

    let target = api.resolve_stream_target("42", 1).await.unwrap();
    assert_eq!(target.stream_url, "https://cdn/1.m3u8");
    assert_eq!(target.kind, StreamKind::Hls);
    assert_eq!(target.poster_url.as_deref(), Some("https://img/1.jpg"));

    let err = api.resolve_stream_target("42", 7).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);
}
