/// EnglishPod Transcripts
///
/// Parses captured YouTube descriptions of EnglishPod episodes into
/// structured transcripts (dialogue, key and supplementary vocabulary),
/// organizes the description library and enriches vocabulary with
/// pronunciations.

pub mod config;
pub mod description;
pub mod error;
pub mod export;
pub mod library;
pub mod pronunciation;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::description::{
    parse, CategoryMap, DescriptionParser, DialogueTurn, Level, ParseOutcome, TranscriptRecord,
    VocabCategory, VocabularyEntry,
};
pub use crate::error::{Error, Result};
pub use crate::library::{BatchProcessor, BatchResult};
pub use crate::pronunciation::{DictionaryApiClient, PronunciationEnricher, PronunciationLookup};
