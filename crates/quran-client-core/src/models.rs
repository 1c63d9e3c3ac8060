//! Records returned by the upstream content API.
//!
//! Payloads are passed through as received; optional fields absent in a
//! response decode to `None` or an empty collection.

use serde::{Deserialize, Serialize};

/// Localised chapter name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedName {
    pub language_name: String,
    pub name: String,
}

/// A surah with its naming and revelation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    #[serde(default)]
    pub revelation_place: Option<String>,
    #[serde(default)]
    pub revelation_order: Option<u32>,
    #[serde(default)]
    pub bismillah_pre: Option<bool>,
    pub name_simple: String,
    #[serde(default)]
    pub name_complex: Option<String>,
    #[serde(default)]
    pub name_arabic: Option<String>,
    pub verses_count: u32,
    /// First and last mushaf page
    #[serde(default)]
    pub pages: Vec<u32>,
    #[serde(default)]
    pub translated_name: Option<TranslatedName>,
}

/// A translation attached to a verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub id: Option<u64>,
    pub resource_id: u32,
    #[serde(default)]
    pub resource_name: Option<String>,
    #[serde(default)]
    pub language_name: Option<String>,
    pub text: String,
}

/// Recitation audio for a chapter or verse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFile {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub chapter_id: Option<u32>,
    #[serde(alias = "audio_url")]
    pub url: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub file_size: Option<f64>,
    /// Word timing segments as sent by the API
    #[serde(default)]
    pub segments: Vec<Vec<f64>>,
}

/// A single ayah
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub verse_number: u32,
    /// `chapter:verse`
    pub verse_key: String,
    #[serde(default)]
    pub text_uthmani: String,
    #[serde(default)]
    pub text_imlaei_simple: Option<String>,
    #[serde(default)]
    pub juz_number: Option<u32>,
    #[serde(default)]
    pub hizb_number: Option<u32>,
    #[serde(default)]
    pub rub_el_hizb_number: Option<u32>,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub audio: Option<AudioFile>,
}

impl Verse {
    /// Chapter number parsed from the verse key
    pub fn chapter_id(&self) -> Option<u32> {
        self.verse_key.split_once(':')?.0.parse().ok()
    }
}

/// A reciter available for chapter audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reciter {
    pub id: u32,
    #[serde(alias = "name")]
    pub reciter_name: String,
    #[serde(default)]
    pub name_arabic: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub relative_path: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub files_size: Option<f64>,
}

/// Pagination block of list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub per_page: u32,
    pub current_page: u32,
    #[serde(default)]
    pub next_page: Option<u32>,
    pub total_pages: u32,
    pub total_records: u32,
}

/// One page of verses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersePage {
    pub verses: Vec<Verse>,
    pub pagination: Pagination,
}

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ChaptersResponse {
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VersesResponse {
    pub verses: Vec<Verse>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AudioResponse {
    #[serde(default)]
    pub audio_files: Vec<AudioFile>,
    #[serde(default)]
    pub audio_file: Option<AudioFile>,
}

impl AudioResponse {
    pub fn into_files(self) -> Vec<AudioFile> {
        let mut files = self.audio_files;
        files.extend(self.audio_file);
        files
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecitersResponse {
    pub recitations: Vec<Reciter>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub search: SearchBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchBody {
    #[serde(default)]
    pub results: Vec<Verse>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl SearchBody {
    /// Search responses carry their paging at the top level instead of a
    /// pagination block; normalise to the verse-list shape.
    pub fn into_page(self, per_page: u32) -> VersePage {
        let pagination = self.pagination.unwrap_or(Pagination {
            per_page,
            current_page: self.current_page,
            next_page: (self.current_page < self.total_pages).then(|| self.current_page + 1),
            total_pages: self.total_pages,
            total_records: self.total_results,
        });

        VersePage {
            verses: self.results,
            pagination,
        }
    }
}
