/// Pronunciation enrichment
///
/// Looks up IPA pronunciations for vocabulary entries and attaches them to
/// records that do not have one yet.

pub mod client;
pub mod enrich;

// Re-export main types
pub use client::{select_pronunciation, DictionaryApiClient, DictionaryEntry, Phonetic};
pub use enrich::{EnrichmentStats, PronunciationEnricher};

use crate::error::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static CATEGORY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?)\s*\([^)]+\)$").unwrap());

/// Source of pronunciations for single words or short phrases
#[async_trait]
pub trait PronunciationLookup: Send + Sync {
    /// `Ok(None)` when the source has no pronunciation for the word
    async fn lookup(&self, word: &str) -> Result<Option<String>>;
}

/// Strip a trailing category group: `Dare to say (phrase)` → `Dare to say`
pub fn clean_word(word: &str) -> String {
    match CATEGORY_SUFFIX.captures(word.trim()) {
        Some(captures) => captures[1].trim().to_string(),
        None => word.trim().to_string(),
    }
}
