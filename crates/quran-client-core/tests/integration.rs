//! Integration tests for quran-client-core
//!
//! These tests verify the client against a mock content source:
//! - Cache hits, expiry and clearing
//! - Parameter-distinct cache entries
//! - Fallback vs propagating error behaviour
//! - Coalescing of concurrent identical requests

use async_trait::async_trait;
use quran_client_core::{
    AppConfig, ContentSource, Error, QuranClient, ResponseCache, Result, SearchRequest,
    SourceInfo, VersesRequest,
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// Mock Source for Testing
// =============================================================================

type Responder = dyn Fn(&str, &[(&str, String)]) -> Result<Value> + Send + Sync;

/// A mock content source that answers from a closure and records every request.
struct MockSource {
    respond: Box<Responder>,
    requests: Mutex<Vec<String>>,
    /// Simulated network latency
    delay: Option<Duration>,
    /// Simulate an outage if true
    failing: AtomicBool,
}

impl MockSource {
    fn new(
        respond: impl Fn(&str, &[(&str, String)]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
            delay: None,
            failing: AtomicBool::new(false),
        }
    }

    /// Source backed by canned quran.com payloads
    fn canned() -> Self {
        Self::new(canned_response)
    }

    /// Source that fails every request with the given status
    fn failing_with(status: u16) -> Self {
        Self::new(move |_, _| {
            Err(Error::RemoteError {
                status,
                body: "upstream error".to_string(),
            })
        })
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of requests whose path starts with `prefix`
    fn count(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for MockSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "mock",
            base_url: "mock://".to_string(),
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.requests
            .lock()
            .unwrap()
            .push(format!("{path}?{}", pairs.join("&")));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::RemoteUnavailable("connection refused".to_string()));
        }

        (self.respond)(path, query)
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

fn param<'a>(query: &'a [(&str, String)], name: &str) -> Option<&'a str> {
    query.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
}

fn verse_json(key: &str, text: &str, translations: &str) -> Value {
    let (chapter, number) = key.split_once(':').unwrap();
    json!({
        "id": 1,
        "verse_number": number.parse::<u32>().unwrap(),
        "verse_key": key,
        "text_uthmani": text,
        "text_imlaei_simple": "simple",
        "juz_number": 1,
        "hizb_number": 1,
        "rub_el_hizb_number": 1,
        "page_number": chapter.parse::<u32>().unwrap(),
        "translations": translations
            .split(',')
            .map(|id| {
                json!({
                    "resource_id": id.parse::<u32>().unwrap(),
                    "text": format!("translation {id}")
                })
            })
            .collect::<Vec<_>>()
    })
}

const BISMILLAH: &str = "بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ";
const AUDIO_URL: &str = "https://download.quranicaudio.com/qdc/mishari_al_afasy/murattal/1.mp3";

fn canned_response(path: &str, query: &[(&str, String)]) -> Result<Value> {
    let translations = param(query, "translations").unwrap_or("131");

    match path {
        "chapters" => Ok(json!({
            "chapters": [{
                "id": 112,
                "revelation_place": "makkah",
                "revelation_order": 22,
                "bismillah_pre": true,
                "name_simple": "Al-Ikhlas",
                "name_complex": "Al-'Ikhlāş",
                "name_arabic": "الإخلاص",
                "verses_count": 1,
                "pages": [604, 604],
                "translated_name": {"language_name": "english", "name": "Sincerity"}
            }]
        })),
        "verses/by_key/1%3A1" => Ok(json!({
            "verses": [verse_json("1:1", BISMILLAH, translations)]
        })),
        "verses/by_key/112%3A1" => Ok(json!({
            "verses": [verse_json("112:1", "قُلْ هُوَ ٱللَّهُ أَحَدٌ", translations)]
        })),
        "verses/by_key/999%3A1" => Ok(json!({ "verses": [] })),
        "verses/by_chapter/2" => {
            let page: u32 = param(query, "page").unwrap_or("1").parse().unwrap();
            let key = format!("2:{page}");
            Ok(json!({
                "verses": [verse_json(&key, &format!("page {page}"), translations)],
                "pagination": {
                    "per_page": 1,
                    "current_page": page,
                    "next_page": page + 1,
                    "total_pages": 286,
                    "total_records": 286
                }
            }))
        }
        "chapter_recitations/7/1" => Ok(json!({
            "audio_files": [{
                "id": 1,
                "chapter_id": 1,
                "audio_url": AUDIO_URL,
                "duration": 44.0,
                "format": "mp3",
                "segments": [[1, 0.0, 630.0]]
            }]
        })),
        "resources/recitations" => Ok(json!({
            "recitations": [
                {"id": 7, "reciter_name": "Mishari Rashid al-`Afasy", "style": "Murattal"},
                {"id": 3, "reciter_name": "Abdur-Rahman as-Sudais"}
            ]
        })),
        "search" => Ok(json!({
            "search": {
                "query": param(query, "q").unwrap_or_default(),
                "total_results": 1,
                "current_page": 1,
                "total_pages": 1,
                "results": [verse_json("1:3", "ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ", translations)]
            }
        })),
        other => Err(Error::RemoteError {
            status: 404,
            body: format!("no route for {other}"),
        }),
    }
}

fn client(source: &Arc<MockSource>) -> QuranClient {
    QuranClient::with_source(Arc::clone(source) as Arc<dyn ContentSource>, AppConfig::default())
}

// =============================================================================
// Caching Tests
// =============================================================================

#[tokio::test]
async fn test_same_call_within_ttl_hits_network_once() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    let first = client.chapters().await;
    let second = client.chapters().await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(source.count("chapters"), 1, "Second call should be served from cache");
}

#[tokio::test]
async fn test_call_after_ttl_refetches() {
    let source = Arc::new(MockSource::canned());
    let cache = ResponseCache::with_ttl(100, Duration::from_millis(50));
    let client = QuranClient::with_cache(
        Arc::clone(&source) as Arc<dyn ContentSource>,
        cache,
        AppConfig::default(),
    );

    client.verse("1:1", &[131]).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    client.verse("1:1", &[131]).await.unwrap();
    client.verse("1:1", &[131]).await.unwrap();

    assert_eq!(
        source.count("verses/by_key/1%3A1"),
        2,
        "Expired entry should be refetched once"
    );
}

#[tokio::test]
async fn test_clear_cache_forces_new_request() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    client.reciters().await;
    assert_eq!(client.cache().entry_count().await, 1);
    client.clear_cache();
    client.reciters().await;

    assert_eq!(source.count("resources/recitations"), 2);
}

#[tokio::test]
async fn test_zero_ttl_fetches_every_call() {
    let source = Arc::new(MockSource::canned());
    let mut config = AppConfig::default();
    config.cache.ttl_seconds = 0;
    let client = QuranClient::with_source(Arc::clone(&source) as Arc<dyn ContentSource>, config);

    client.reciters().await;
    client.reciters().await;

    assert_eq!(source.count("resources/recitations"), 2);
    assert_eq!(client.cache().entry_count().await, 0);
}

#[tokio::test]
async fn test_distinct_pages_do_not_collide() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    let page1 = VersesRequest {
        page: 1,
        per_page: 1,
        ..Default::default()
    };
    let page2 = VersesRequest {
        page: 2,
        per_page: 1,
        ..Default::default()
    };

    let first = client.chapter_verses(2, &page1).await.unwrap();
    let second = client.chapter_verses(2, &page2).await.unwrap();
    assert_eq!(first.verses[0].verse_key, "2:1");
    assert_eq!(second.verses[0].verse_key, "2:2");

    // Both remain cached independently
    let first_again = client.chapter_verses(2, &page1).await.unwrap();
    let second_again = client.chapter_verses(2, &page2).await.unwrap();
    assert_eq!(first_again, first);
    assert_eq!(second_again, second);
    assert_eq!(source.count("verses/by_chapter/2"), 2);
}

#[tokio::test]
async fn test_distinct_translation_sets_do_not_collide() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    let single = client.verse("1:1", &[131]).await.unwrap();
    let double = client.verse("1:1", &[131, 20]).await.unwrap();

    assert_eq!(single.translations.len(), 1);
    assert_eq!(double.translations.len(), 2);
    assert_eq!(source.count("verses/by_key/1%3A1"), 2);
}

#[tokio::test]
async fn test_concurrent_identical_requests_share_one_fetch() {
    let source = Arc::new(MockSource::canned().with_delay(Duration::from_millis(50)));
    let client = client(&source);
    let request = VersesRequest {
        page: 3,
        per_page: 1,
        ..Default::default()
    };

    let calls = (0..8).map(|_| client.chapter_verses(2, &request));
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(source.count("verses/by_chapter/2"), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    source.set_failing(true);
    assert!(client.verse("1:1", &[131]).await.is_err());

    source.set_failing(false);
    assert!(client.verse("1:1", &[131]).await.is_ok());
    assert_eq!(source.count("verses/by_key/1%3A1"), 2);
}

// =============================================================================
// Request Shape Tests
// =============================================================================

#[tokio::test]
async fn test_chapter_verses_sends_paging_and_translations() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    let request = VersesRequest {
        page: 4,
        per_page: 10,
        translations: vec![131, 20],
    };
    let page = client.chapter_verses(2, &request).await.unwrap();

    assert_eq!(page.pagination.current_page, 4);
    assert_eq!(
        source.requests(),
        vec![
            "verses/by_chapter/2?page=4&per_page=10&translations=131,20\
             &fields=text_uthmani,text_imlaei_simple"
        ]
    );
}

#[tokio::test]
async fn test_empty_translations_use_default() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    let verse = client.verse("1:1", &[]).await.unwrap();

    assert_eq!(verse.translations[0].resource_id, 131);
    assert!(source.requests()[0].contains("translations=131"));
}

// =============================================================================
// Operation Tests
// =============================================================================

#[tokio::test]
async fn test_get_verse_passes_payload_through() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    let verse = client.verse("1:1", &[131]).await.unwrap();

    assert_eq!(verse.verse_key, "1:1");
    assert_eq!(verse.translations.len(), 1);
    assert_eq!(verse.text_uthmani, BISMILLAH);
}

#[tokio::test]
async fn test_get_verse_with_zero_results_is_not_found() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    let err = client.verse("999:1", &[131]).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {err}");

    // An empty lookup is not remembered
    assert!(client.verse("999:1", &[131]).await.is_err());
    assert_eq!(source.count("verses/by_key/999%3A1"), 2);
}

#[tokio::test]
async fn test_random_verse_picks_from_chapter_list() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    // The canned list has a single one-verse chapter
    let verse = client.random_verse(&[131]).await;
    assert_eq!(verse.verse_key, "112:1");
    assert_eq!(source.count("chapters"), 1);
    assert_eq!(client.source_info().name, "mock");
}

#[tokio::test]
async fn test_chapter_lookup() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    assert_eq!(
        client.chapter(112).await.map(|c| c.name_simple),
        Some("Al-Ikhlas".to_string())
    );
    assert!(client.chapter(1).await.is_none());
    assert_eq!(source.count("chapters"), 1);
}

#[tokio::test]
async fn test_chapter_audio_for_default_reciter() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    let files = client.chapter_audio(1, None).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].format.as_deref(), Some("mp3"));
    assert_eq!(files[0].segments.len(), 1);
}

#[tokio::test]
async fn test_search_returns_results_and_pagination() {
    let source = Arc::new(MockSource::canned());
    let client = client(&source);

    let page = client.search(&SearchRequest::new("merciful")).await.unwrap();
    assert_eq!(page.verses[0].verse_key, "1:3");
    assert_eq!(page.pagination.total_records, 1);
    assert_eq!(page.pagination.next_page, None);
    assert!(source.requests()[0].starts_with("search?q=merciful&page=1&size=20"));
}

// =============================================================================
// Fallback / Error Propagation Tests
// =============================================================================

#[tokio::test]
async fn test_random_verse_falls_back_on_failure() {
    let source = Arc::new(MockSource::failing_with(500));
    let client = client(&source);

    let verse = client.random_verse(&[131]).await;
    assert_eq!(verse.verse_key, "1:1");
}

#[tokio::test]
async fn test_random_verse_falls_back_when_only_lookup_fails() {
    let source = Arc::new(MockSource::new(|path, query| {
        if path == "chapters" {
            canned_response(path, query)
        } else {
            Err(Error::RemoteUnavailable("timeout".to_string()))
        }
    }));
    let client = client(&source);

    assert_eq!(client.random_verse(&[131]).await.verse_key, "1:1");
}

#[tokio::test]
async fn test_chapter_audio_empty_on_failure() {
    let source = Arc::new(MockSource::failing_with(503));
    let client = client(&source);

    assert!(client.chapter_audio(1, Some(7)).await.is_empty());
}

#[tokio::test]
async fn test_reciters_fall_back_to_default() {
    let source = Arc::new(MockSource::failing_with(502));
    let client = client(&source);

    let reciters = client.reciters().await;
    assert!(!reciters.is_empty());
    assert!(reciters.iter().any(|r| r.id == 7));
}

#[tokio::test]
async fn test_chapters_empty_on_failure() {
    let source = Arc::new(MockSource::canned());
    source.set_failing(true);
    let client = client(&source);

    assert!(client.chapters().await.is_empty());
}

#[tokio::test]
async fn test_search_propagates_remote_error() {
    let source = Arc::new(MockSource::failing_with(500));
    let client = client(&source);

    let err = client.search(&SearchRequest::new("light")).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_chapter_verses_propagates_transport_error() {
    let source = Arc::new(MockSource::canned());
    source.set_failing(true);
    let client = client(&source);

    let err = client.chapter_verses(2, &VersesRequest::default()).await.unwrap_err();
    assert!(matches!(err, Error::RemoteUnavailable(_)), "got {err}");
}

#[tokio::test]
async fn test_malformed_payload_is_invalid_response() {
    let source = Arc::new(MockSource::new(|_, _| Ok(json!({"unexpected": true}))));
    let client = client(&source);

    let err = client.verse("1:1", &[131]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)), "got {err}");
}

#[tokio::test]
async fn test_malformed_payload_is_retried() {
    let calls = AtomicUsize::new(0);
    let source = Arc::new(MockSource::new(move |path, query| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(json!({"chapters": "maintenance"}))
        } else {
            canned_response(path, query)
        }
    }));
    let client = client(&source);

    assert!(client.chapters().await.is_empty());
    assert_eq!(client.chapters().await.len(), 1);
    assert_eq!(source.count("chapters"), 2, "Malformed payload must not be cached");
}
