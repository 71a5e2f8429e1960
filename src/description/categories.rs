use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Grammatical category attached to a vocabulary entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VocabCategory {
    Verb,
    Phrase,
    Adjective,
    Noun,
    Adverb,
    Preposition,
}

impl VocabCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VocabCategory::Verb => "verb",
            VocabCategory::Phrase => "phrase",
            VocabCategory::Adjective => "adjective",
            VocabCategory::Noun => "noun",
            VocabCategory::Adverb => "adverb",
            VocabCategory::Preposition => "preposition",
        }
    }
}

impl fmt::Display for VocabCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single token from a parenthesized group was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    Category(VocabCategory),
    Subcategory(String),
    Unrecognized(String),
}

/// Lookup table from description labels ("principle verb", "common noun")
/// to categories, plus the qualifier fragments that mark a subcategory.
///
/// Owned by the parser rather than global so tests can swap it out.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    /// Exact label (lowercase) -> category
    labels: HashMap<String, VocabCategory>,

    /// Fragments (lowercase) that make a token a tense/number qualifier
    qualifiers: Vec<String>,
}

impl CategoryMap {
    /// Create an empty map
    pub fn empty() -> Self {
        Self {
            labels: HashMap::new(),
            qualifiers: Vec::new(),
        }
    }

    /// Register a label for a category
    pub fn with_label(mut self, label: &str, category: VocabCategory) -> Self {
        self.labels.insert(label.trim().to_lowercase(), category);
        self
    }

    /// Register a qualifier fragment
    pub fn with_qualifier(mut self, fragment: &str) -> Self {
        self.qualifiers.push(fragment.trim().to_lowercase());
        self
    }

    /// Classify one token. Labels are matched exactly, qualifiers by substring.
    pub fn classify(&self, token: &str) -> TokenClass {
        let lower = token.trim().to_lowercase();

        if let Some(category) = self.labels.get(&lower) {
            return TokenClass::Category(*category);
        }

        if self.qualifiers.iter().any(|q| lower.contains(q.as_str())) {
            return TokenClass::Subcategory(lower);
        }

        TokenClass::Unrecognized(lower)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::empty()
            .with_label("principle verb", VocabCategory::Verb)
            .with_label("principal verb", VocabCategory::Verb)
            .with_label("verb", VocabCategory::Verb)
            .with_label("phrase", VocabCategory::Phrase)
            .with_label("adjective", VocabCategory::Adjective)
            .with_label("common noun", VocabCategory::Noun)
            .with_label("noun", VocabCategory::Noun)
            .with_label("adverb", VocabCategory::Adverb)
            .with_label("preposition", VocabCategory::Preposition)
            .with_qualifier("present simple")
            .with_qualifier("past simple")
            .with_qualifier("present continuous")
            .with_qualifier("modal")
            .with_qualifier("phrasal")
            .with_qualifier("singular")
            .with_qualifier("plural")
            .with_qualifier("uncountable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_case_insensitive() {
        let map = CategoryMap::default();
        assert_eq!(map.classify("Principle Verb"), TokenClass::Category(VocabCategory::Verb));
        assert_eq!(map.classify("ADJECTIVE"), TokenClass::Category(VocabCategory::Adjective));
        assert_eq!(map.classify(" common noun "), TokenClass::Category(VocabCategory::Noun));
    }

    #[test]
    fn test_qualifiers_become_subcategories() {
        let map = CategoryMap::default();
        assert_eq!(
            map.classify("Present Simple"),
            TokenClass::Subcategory("present simple".to_string())
        );
        assert_eq!(
            map.classify("phrasal verb"),
            TokenClass::Subcategory("phrasal verb".to_string())
        );
    }

    #[test]
    fn test_unknown_token() {
        let map = CategoryMap::default();
        assert_eq!(map.classify("idiom"), TokenClass::Unrecognized("idiom".to_string()));
    }

    #[test]
    fn test_custom_map() {
        let map = CategoryMap::empty().with_label("expression", VocabCategory::Phrase);
        assert_eq!(map.label_count(), 1);
        assert_eq!(map.classify("Expression"), TokenClass::Category(VocabCategory::Phrase));
        assert_eq!(map.classify("verb"), TokenClass::Unrecognized("verb".to_string()));
    }
}
