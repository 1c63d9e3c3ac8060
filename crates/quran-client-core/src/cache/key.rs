use crate::util::join_ids;

/// Cache key for upstream responses.
///
/// Keys are readable strings made of the operation name followed by every
/// parameter that influences the response, so:
/// - Same operation + same parameters = same key
/// - Any differing parameter (page, page size, translation set) = different key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn chapters() -> Self {
        Self("chapters".to_string())
    }

    pub fn chapter_verses(chapter_id: u32, page: u32, per_page: u32, translations: &[u32]) -> Self {
        Self(format!("chapter-{chapter_id}-{page}-{per_page}-{}", join_ids(translations)))
    }

    pub fn verse(verse_key: &str, translations: &[u32]) -> Self {
        Self(format!("verse-{verse_key}-{}", join_ids(translations)))
    }

    pub fn chapter_audio(chapter_id: u32, reciter_id: u32) -> Self {
        Self(format!("audio-{reciter_id}-{chapter_id}"))
    }

    pub fn reciters() -> Self {
        Self("reciters".to_string())
    }

    pub fn search(query: &str, page: u32, size: u32, translations: &[u32]) -> Self {
        Self(format!("search-{query}-{page}-{size}-{}", join_ids(translations)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
