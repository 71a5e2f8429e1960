use super::categories::{CategoryMap, TokenClass};
use super::VocabularyEntry;

/// Parse a vocabulary line such as
/// `Grab (principle verb, present simple): Get quickly`.
///
/// Returns `None` when the line yields an empty word.
pub fn parse_vocabulary_line(line: &str, categories: &CategoryMap) -> Option<VocabularyEntry> {
    let (head, definition) = match line.split_once(':') {
        Some((head, definition)) => (head.trim(), definition.trim()),
        None => (line.trim(), ""),
    };

    let (word, tokens) = split_word_and_tokens(head);
    if word.is_empty() {
        return None;
    }

    let mut entry = VocabularyEntry::new(word, definition);

    for token in tokens.iter().filter(|t| !t.is_empty()) {
        match categories.classify(token) {
            TokenClass::Category(category) => {
                if entry.category.is_none() {
                    entry.category = Some(category);
                }
            }
            TokenClass::Subcategory(sub) => {
                if entry.subcategory.is_none() {
                    entry.subcategory = Some(sub);
                }
            }
            // Free-form notes such as "informal" carry no tag
            TokenClass::Unrecognized(_) => {}
        }
    }

    Some(entry)
}

/// Split `Word (a, b)` into the word and its parenthesized tokens
fn split_word_and_tokens(head: &str) -> (&str, Vec<&str>) {
    let Some(open) = head.find('(') else {
        return (head, Vec::new());
    };
    let Some(close) = head[open..].find(')').map(|offset| open + offset) else {
        return (head, Vec::new());
    };

    let word = head[..open].trim();
    let tokens = head[open + 1..close].split(',').map(str::trim).collect();
    (word, tokens)
}
