/// Description parsing module
///
/// Turns the expanded HTML of an EnglishPod video description into a
/// structured transcript: title, level, dialogue and two vocabulary lists.

pub mod categories;
pub mod normalize;
pub mod parser;
pub mod vocabulary;

// Re-export main types
pub use categories::{CategoryMap, TokenClass, VocabCategory};
pub use normalize::normalize_lines;
pub use parser::{parse, DescriptionParser, ParseOutcome, Section};
pub use vocabulary::parse_vocabulary_line;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty level announced in the title line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Level {
    Elementary,
    Intermediate,
    #[serde(rename = "Upper Intermediate")]
    UpperIntermediate,
    Advanced,
    #[default]
    Unknown,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Elementary,
        Level::Intermediate,
        Level::UpperIntermediate,
        Level::Advanced,
        Level::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Elementary => "Elementary",
            Level::Intermediate => "Intermediate",
            Level::UpperIntermediate => "Upper Intermediate",
            Level::Advanced => "Advanced",
            Level::Unknown => "Unknown",
        }
    }

    /// Directory name used when filing descriptions by level
    pub fn folder_name(&self) -> &'static str {
        match self {
            Level::UpperIntermediate => "Upper_Intermediate",
            other => other.as_str(),
        }
    }

    /// Detect the level from a title line.
    ///
    /// Priority: Elementary, Upper Intermediate, Intermediate, Advanced.
    pub fn detect(text: &str) -> Self {
        if text.contains("Elementary") {
            Level::Elementary
        } else if text.contains("Upper Intermediate") || text.contains("Upper-Intermediate") {
            Level::UpperIntermediate
        } else if text.contains("Intermediate") {
            Level::Intermediate
        } else if text.contains("Advanced") {
            Level::Advanced
        } else {
            Level::Unknown
        }
    }

    /// Detect the level from a renamed file such as
    /// `video_052_EnglishPod_52_-_Upper_Intermediate_-_Bad_Date.html`
    pub fn from_filename(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("elementary") {
            Level::Elementary
        } else if ["upper_intermediate", "upper-intermediate", "upper intermediate"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            Level::UpperIntermediate
        } else if lower.contains("intermediate") {
            Level::Intermediate
        } else if lower.contains("advanced") {
            Level::Advanced
        } else {
            Level::Unknown
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueTurn {
    /// Single uppercase letter, e.g. "A"
    pub speaker: String,
    pub text: String,
}

/// A vocabulary item from either vocabulary section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub word: String,
    pub definition: String,
    pub category: Option<VocabCategory>,
    pub subcategory: Option<String>,
    /// IPA pronunciation, attached later by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
}

impl VocabularyEntry {
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
            category: None,
            subcategory: None,
            pronunciation: None,
        }
    }

    /// True when a non-empty pronunciation is already attached
    pub fn has_pronunciation(&self) -> bool {
        self.pronunciation
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Structured transcript parsed from one description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRecord {
    pub title: String,
    pub level: Level,
    pub dialogue: Vec<DialogueTurn>,
    pub key_vocabulary: Vec<VocabularyEntry>,
    pub supplementary_vocabulary: Vec<VocabularyEntry>,
}

impl TranscriptRecord {
    /// True when nothing at all was recognized in the source
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.dialogue.is_empty()
            && self.key_vocabulary.is_empty()
            && self.supplementary_vocabulary.is_empty()
    }

    /// All vocabulary, key entries first
    pub fn vocabulary(&self) -> impl Iterator<Item = &VocabularyEntry> {
        self.key_vocabulary.iter().chain(self.supplementary_vocabulary.iter())
    }

    pub fn vocabulary_mut(&mut self) -> impl Iterator<Item = &mut VocabularyEntry> {
        self.key_vocabulary
            .iter_mut()
            .chain(self.supplementary_vocabulary.iter_mut())
    }
}
