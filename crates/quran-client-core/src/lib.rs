//! Quran Client Core Library
//!
//! This library provides a cached, typed client for the quran.com v4 content API:
//! - Chapters, verses by chapter or key, random verse, search
//! - Chapter recitation audio and the reciter list
//! - Time-bounded response caching with coalesced concurrent fetches
//! - Built-in fallback data for discovery views when the API is unreachable

pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod models;
pub mod source;
pub mod util;

pub use cache::{CacheKey, ResponseCache};
pub use config::{
    ApiConfig, AppConfig, CacheConfig, DEFAULT_API_BASE, DEFAULT_RECITER, DEFAULT_TRANSLATION,
};
pub use error::{Error, Result};
pub use models::{AudioFile, Chapter, Pagination, Reciter, Translation, Verse, VersePage};
pub use source::{ContentSource, HttpSource, SourceInfo, create_source};

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use models::{AudioResponse, ChaptersResponse, RecitersResponse, SearchResponse, VersesResponse};

/// Verse text fields requested alongside the default ones
const VERSE_FIELDS: &str = "text_uthmani,text_imlaei_simple";

/// Paging and translation options for chapter verse listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersesRequest {
    pub page: u32,
    pub per_page: u32,
    /// Translation resource ids; empty means the configured default
    pub translations: Vec<u32>,
}

impl Default for VersesRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
            translations: Vec::new(),
        }
    }
}

/// Full-text search options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub size: u32,
    /// Translation resource ids; empty means the configured default
    pub translations: Vec<u32>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            size: 20,
            translations: Vec::new(),
        }
    }
}

/// High-level content client that combines the upstream source and the cache.
///
/// Chapter listing, random verse, chapter audio and the reciter list never
/// fail: on any upstream error they log and serve built-in data (or nothing).
/// Verse listings, verse lookup and search return the error to the caller.
pub struct QuranClient {
    source: Arc<dyn ContentSource>,
    cache: ResponseCache,
    config: AppConfig,
}

impl QuranClient {
    /// Create a new client talking to the configured API
    pub fn new(config: AppConfig) -> Result<Self> {
        let source = create_source(&config.api)?;
        let cache = ResponseCache::new(&config.cache);

        Ok(Self {
            source,
            cache,
            config,
        })
    }

    /// Create with a custom content source
    pub fn with_source(source: Arc<dyn ContentSource>, config: AppConfig) -> Self {
        let cache = ResponseCache::new(&config.cache);

        Self {
            source,
            cache,
            config,
        }
    }

    /// Create with a shared cache (for cache sharing across instances)
    pub fn with_cache(
        source: Arc<dyn ContentSource>,
        cache: ResponseCache,
        config: AppConfig,
    ) -> Self {
        Self {
            source,
            cache,
            config,
        }
    }

    /// All chapters in order; empty if the API cannot be reached
    pub async fn chapters(&self) -> Vec<Chapter> {
        match self.fetch_chapters().await {
            Ok(chapters) => chapters,
            Err(e) => {
                warn!("Failed to fetch chapters, serving an empty list: {}", e);
                Vec::new()
            }
        }
    }

    /// A single chapter from the chapter list
    pub async fn chapter(&self, id: u32) -> Option<Chapter> {
        self.chapters().await.into_iter().find(|chapter| chapter.id == id)
    }

    /// One page of a chapter's verses
    pub async fn chapter_verses(
        &self,
        chapter_id: u32,
        request: &VersesRequest,
    ) -> Result<VersePage> {
        let translations = self.translations_or_default(&request.translations);
        let key =
            CacheKey::chapter_verses(chapter_id, request.page, request.per_page, &translations);
        let query = vec![
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
            ("translations", util::join_ids(&translations)),
            ("fields", VERSE_FIELDS.to_string()),
        ];

        let response: VersesResponse = self
            .fetch(&key, &format!("verses/by_chapter/{chapter_id}"), query)
            .await
            .inspect_err(|e| {
                error!("Failed to fetch verses of chapter {}: {}", chapter_id, e);
            })?;

        let pagination = response.pagination.unwrap_or_else(|| Pagination {
            per_page: request.per_page,
            current_page: request.page,
            next_page: None,
            total_pages: request.page,
            total_records: u32::try_from(response.verses.len()).unwrap_or(u32::MAX),
        });

        Ok(VersePage {
            verses: response.verses,
            pagination,
        })
    }

    /// A single verse by its `chapter:verse` key
    pub async fn verse(&self, verse_key: &str, translations: &[u32]) -> Result<Verse> {
        let translations = self.translations_or_default(translations);
        let key = CacheKey::verse(verse_key, &translations);
        let query = vec![
            ("translations", util::join_ids(&translations)),
            ("fields", VERSE_FIELDS.to_string()),
        ];
        let path = format!("verses/by_key/{}", urlencoding::encode(verse_key));

        let not_found = || Error::NotFound(format!("verse {verse_key}"));
        let result = self
            .fetch_checked(&key, &path, query, |response: &VersesResponse| {
                if response.verses.is_empty() {
                    Err(not_found())
                } else {
                    Ok(())
                }
            })
            .await
            .and_then(|response| {
                response
                    .verses
                    .into_iter()
                    .next()
                    .ok_or_else(not_found)
            });

        result.inspect_err(|e| error!("Failed to fetch verse {}: {}", verse_key, e))
    }

    /// A uniformly chosen verse; Al-Fatihah 1:1 if anything goes wrong
    pub async fn random_verse(&self, translations: &[u32]) -> Verse {
        match self.try_random_verse(translations).await {
            Ok(verse) => verse,
            Err(e) => {
                warn!("Failed to fetch a random verse, serving 1:1: {}", e);
                fallback::verse()
            }
        }
    }

    async fn try_random_verse(&self, translations: &[u32]) -> Result<Verse> {
        let chapters = self.fetch_chapters().await?;

        let (chapter_id, verse_number) = {
            let mut rng = rand::rng();
            let chapter = chapters
                .choose(&mut rng)
                .ok_or_else(|| Error::NotFound("chapters".to_string()))?;
            if chapter.verses_count == 0 {
                return Err(Error::NotFound(format!("verses of chapter {}", chapter.id)));
            }
            (chapter.id, rng.random_range(1..=chapter.verses_count))
        };

        debug!("Picked random verse {}:{}", chapter_id, verse_number);
        self.verse(&format!("{chapter_id}:{verse_number}"), translations).await
    }

    /// Recitation audio for a chapter; empty if the API cannot be reached
    pub async fn chapter_audio(
        &self,
        chapter_id: u32,
        reciter_id: Option<u32>,
    ) -> Vec<AudioFile> {
        let reciter_id = reciter_id.unwrap_or(self.config.api.default_reciter);
        let key = CacheKey::chapter_audio(chapter_id, reciter_id);
        let path = format!("chapter_recitations/{reciter_id}/{chapter_id}");

        match self.fetch::<AudioResponse>(&key, &path, Vec::new()).await {
            Ok(response) => response.into_files(),
            Err(e) => {
                warn!(
                    "Failed to fetch audio for chapter {} (reciter {}): {}",
                    chapter_id, reciter_id, e
                );
                Vec::new()
            }
        }
    }

    /// Available reciters; the default reciter alone if the API cannot be reached
    pub async fn reciters(&self) -> Vec<Reciter> {
        match self
            .fetch::<RecitersResponse>(&CacheKey::reciters(), "resources/recitations", Vec::new())
            .await
        {
            Ok(response) => response.recitations,
            Err(e) => {
                warn!("Failed to fetch reciters, serving the default: {}", e);
                vec![fallback::reciter()]
            }
        }
    }

    /// Full-text search over verses and translations
    pub async fn search(&self, request: &SearchRequest) -> Result<VersePage> {
        let translations = self.translations_or_default(&request.translations);
        let key = CacheKey::search(&request.query, request.page, request.size, &translations);
        let query = vec![
            ("q", request.query.clone()),
            ("page", request.page.to_string()),
            ("size", request.size.to_string()),
            ("translations", util::join_ids(&translations)),
        ];

        let response: SearchResponse = self
            .fetch(&key, "search", query)
            .await
            .inspect_err(|e| error!("Search for '{}' failed: {}", request.query, e))?;

        Ok(response.search.into_page(request.size))
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        info!("Clearing response cache");
        self.cache.clear();
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn source_info(&self) -> SourceInfo {
        self.source.info()
    }

    pub const fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    async fn fetch_chapters(&self) -> Result<Vec<Chapter>> {
        let response: ChaptersResponse = self
            .fetch(&CacheKey::chapters(), "chapters", Vec::new())
            .await?;
        Ok(response.chapters)
    }

    /// Cached GET decoded into `T`
    async fn fetch<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
        path: &str,
        query: Vec<(&'static str, String)>,
    ) -> Result<T> {
        self.fetch_checked(key, path, query, |_: &T| Ok(())).await
    }

    /// Cached GET decoded into `T`.
    ///
    /// Only payloads that decode and pass `check` are stored, so a malformed
    /// or empty answer is retried on the next call.
    async fn fetch_checked<T, C>(
        &self,
        key: &CacheKey,
        path: &str,
        query: Vec<(&'static str, String)>,
        check: C,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        C: FnOnce(&T) -> Result<()>,
    {
        let mut decoded = None;
        let payload = self
            .cache
            .get_or_fetch(key, async {
                debug!("Fetching {} from {}", key, self.source.name());
                let value = self.source.get_json(path, &query).await?;
                let parsed = decode::<T>(key, &value)?;
                check(&parsed)?;
                decoded = Some(parsed);
                Ok(value)
            })
            .await?;

        match decoded {
            Some(parsed) => Ok(parsed),
            None => decode(key, &payload),
        }
    }

    fn translations_or_default(&self, translations: &[u32]) -> Vec<u32> {
        if translations.is_empty() {
            vec![self.config.api.default_translation]
        } else {
            translations.to_vec()
        }
    }
}

fn decode<T: DeserializeOwned>(key: &CacheKey, payload: &Value) -> Result<T> {
    T::deserialize(payload).map_err(|e| Error::InvalidResponse(format!("{key}: {e}")))
}
