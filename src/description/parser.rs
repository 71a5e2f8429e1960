/// Line-oriented parser for EnglishPod video descriptions
use super::categories::CategoryMap;
use super::normalize::normalize_lines;
use super::vocabulary::parse_vocabulary_line;
use super::{DialogueTurn, Level, TranscriptRecord};
use regex::Regex;

/// Token that marks the first line as the episode title
pub const DEFAULT_TITLE_MARKER: &str = "EnglishPod";

/// Section the parser is currently accumulating into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    None,
    Conversation,
    KeyVocabulary,
    SupplementaryVocabulary,
}

impl Section {
    /// Recognize a section header line.
    ///
    /// "Conversation" must be the whole line; the vocabulary headers may
    /// carry extra words around them. A trailing colon is ignored.
    pub fn from_header(line: &str) -> Option<Section> {
        let lower = line.trim().trim_end_matches(':').trim_end().to_lowercase();

        if lower == "conversation" {
            Some(Section::Conversation)
        } else if lower.contains("key vocabulary") {
            Some(Section::KeyVocabulary)
        } else if lower.contains("supplementary vocabulary") {
            Some(Section::SupplementaryVocabulary)
        } else {
            None
        }
    }
}

/// Record plus bookkeeping about how much of the input was understood.
///
/// An unrecognizable description is a valid outcome with an empty record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub record: TranscriptRecord,
    /// Non-empty lines after normalization
    pub lines_seen: usize,
    /// Lines that were neither title, header nor data
    pub skipped_lines: usize,
    /// Section headers in the order they were entered
    pub sections_seen: Vec<Section>,
}

impl ParseOutcome {
    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }
}

/// Description parser. Stateless between calls and safe to share.
#[derive(Debug, Clone)]
pub struct DescriptionParser {
    categories: CategoryMap,
    title_marker: String,
    dialogue_pattern: Regex,
}

impl DescriptionParser {
    pub fn new() -> Self {
        Self::with_categories(CategoryMap::default())
    }

    /// Create a parser with a custom category table
    pub fn with_categories(categories: CategoryMap) -> Self {
        Self {
            categories,
            title_marker: DEFAULT_TITLE_MARKER.to_string(),
            dialogue_pattern: Regex::new(r"^([A-Z]):\s*(.+)$").unwrap(),
        }
    }

    /// Override the token that identifies a title line
    pub fn with_title_marker(mut self, marker: impl Into<String>) -> Self {
        self.title_marker = marker.into();
        self
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    /// Parse a description into a transcript record
    pub fn parse(&self, html: &str) -> TranscriptRecord {
        self.parse_report(html).record
    }

    /// Parse a description and report what was recognized
    pub fn parse_report(&self, html: &str) -> ParseOutcome {
        let lines = normalize_lines(html);
        let mut record = TranscriptRecord::default();
        let mut section = Section::None;
        let mut sections_seen = Vec::new();
        let mut skipped_lines = 0;

        for (index, line) in lines.iter().enumerate() {
            if index == 0 && self.is_title_line(line) {
                record.title = line.clone();
                record.level = Level::detect(line);
                continue;
            }

            if let Some(next) = Section::from_header(line) {
                section = next;
                sections_seen.push(next);
                continue;
            }

            let accepted = match section {
                Section::None => false,
                Section::Conversation => match self.parse_dialogue_line(line) {
                    Some(turn) => {
                        record.dialogue.push(turn);
                        true
                    }
                    // Continuation lines are not merged into the previous turn
                    None => false,
                },
                Section::KeyVocabulary => match parse_vocabulary_line(line, &self.categories) {
                    Some(entry) => {
                        record.key_vocabulary.push(entry);
                        true
                    }
                    None => false,
                },
                Section::SupplementaryVocabulary => {
                    match parse_vocabulary_line(line, &self.categories) {
                        Some(entry) => {
                            record.supplementary_vocabulary.push(entry);
                            true
                        }
                        None => false,
                    }
                }
            };

            if !accepted {
                skipped_lines += 1;
            }
        }

        ParseOutcome {
            record,
            lines_seen: lines.len(),
            skipped_lines,
            sections_seen,
        }
    }

    fn is_title_line(&self, line: &str) -> bool {
        !self.title_marker.is_empty() && line.contains(self.title_marker.as_str())
    }

    fn parse_dialogue_line(&self, line: &str) -> Option<DialogueTurn> {
        let captures = self.dialogue_pattern.captures(line)?;
        let speaker = captures.get(1)?.as_str().to_string();
        let text = captures.get(2)?.as_str().trim().to_string();

        Some(DialogueTurn { speaker, text })
    }
}

impl Default for DescriptionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse with the default category table and title marker
pub fn parse(html: &str) -> TranscriptRecord {
    DescriptionParser::new().parse(html)
}
