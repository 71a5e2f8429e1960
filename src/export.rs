/// JSON and TypeScript rendering of transcript records
use crate::description::{TranscriptRecord, VocabularyEntry};
use crate::error::Result;

/// Pretty-printed JSON array of records
pub fn to_json(records: &[TranscriptRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Escape backslashes and double quotes for a TypeScript string literal
pub fn escape_ts(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// One-sentence episode blurb derived from the title
pub fn episode_description(title: &str) -> String {
    match title.rsplit_once(" - ") {
        Some((_, topic)) => format!("Learn {} through this lesson.", topic.to_lowercase()),
        None => "Learn English through this lesson.".to_string(),
    }
}

/// Render one record as an `Episode` object literal
pub fn render_typescript_episode(record: &TranscriptRecord, video_id: &str, episode_number: usize) -> String {
    let dialogue = record
        .dialogue
        .iter()
        .map(|turn| {
            format!(
                "      {{ speaker: \"{}\", text: \"{}\" }}",
                escape_ts(&turn.speaker),
                escape_ts(&turn.text)
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    let vocabulary = render_vocabulary(&record.key_vocabulary);
    let supplementary = render_vocabulary(&record.supplementary_vocabulary);
    let video_id = escape_ts(video_id);

    format!(
        "  {{\n    id: {episode_number},\n    videoId: \"{video_id}\",\n    title: \"{title}\",\n    level: \"{level}\",\n    description: \"{description}\",\n    audioUrl: \"https://www.youtube.com/watch?v={video_id}\",\n    transcript: {{\n      dialogue: [\n{dialogue}\n      ],\n      vocabulary: [\n{vocabulary}\n      ],\n      supplementaryVocabulary: [\n{supplementary}\n      ]\n    }}\n  }}",
        title = escape_ts(&record.title),
        level = escape_ts(record.level.as_str()),
        description = escape_ts(&episode_description(&record.title)),
    )
}

fn render_vocabulary(entries: &[VocabularyEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let mut item = format!(
                "      {{\n        word: \"{}\",\n        definition: \"{}\"",
                escape_ts(&entry.word),
                escape_ts(&entry.definition)
            );
            if let Some(category) = entry.category {
                item.push_str(&format!(",\n        category: \"{}\"", category));
            }
            if let Some(subcategory) = &entry.subcategory {
                item.push_str(&format!(",\n        subcategory: \"{}\"", escape_ts(subcategory)));
            }
            if let Some(pronunciation) = entry.pronunciation.as_deref().filter(|p| !p.is_empty()) {
                item.push_str(&format!(",\n        pronunciation: \"{}\"", escape_ts(pronunciation)));
            }
            item.push_str("\n      }");
            item
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Wrap rendered episodes into a complete `youtubeEpisodes` module
pub fn render_typescript_module(episodes: &[String]) -> String {
    let mut content = String::new();

    content.push_str("import type { Episode } from '../types';\n\n");
    content.push_str("/**\n");
    content.push_str(" * YouTube EnglishPod Episodes\n");
    content.push_str(" * Auto-generated from YouTube video descriptions\n");
    content.push_str(" *\n");
    content.push_str(&format!(" * Total Episodes: {}\n", episodes.len()));
    content.push_str(&format!(
        " * Generated: {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    content.push_str(" */\n\n");
    content.push_str("export const youtubeEpisodes: Episode[] = [\n");
    content.push_str(&episodes.join(",\n\n"));
    content.push_str("\n];\n\n");
    content.push_str("export default youtubeEpisodes;\n");

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{parse, DialogueTurn, Level, VocabCategory};

    fn sample_record() -> TranscriptRecord {
        let mut grab = VocabularyEntry::new("Grab", "Get \"quickly\"");
        grab.category = Some(VocabCategory::Verb);
        grab.subcategory = Some("present simple".to_string());

        TranscriptRecord {
            title: "EnglishPod 1 - Elementary - Difficult Customer".to_string(),
            level: Level::Elementary,
            dialogue: vec![DialogueTurn {
                speaker: "A".to_string(),
                text: "Good evening.".to_string(),
            }],
            key_vocabulary: vec![grab],
            supplementary_vocabulary: vec![VocabularyEntry::new("Impatient", "Uncomfortable waiting")],
        }
    }

    #[test]
    fn test_episode_description() {
        assert_eq!(
            episode_description("EnglishPod 1 - Elementary - Difficult Customer"),
            "Learn difficult customer through this lesson."
        );
        assert_eq!(episode_description("Bonus"), "Learn English through this lesson.");
    }

    #[test]
    fn test_escape_ts() {
        assert_eq!(escape_ts(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
    }

    #[test]
    fn test_render_episode() {
        let ts = render_typescript_episode(&sample_record(), "video_1", 1);

        assert!(ts.contains("id: 1,"));
        assert!(ts.contains("videoId: \"video_1\","));
        assert!(ts.contains("level: \"Elementary\","));
        assert!(ts.contains("{ speaker: \"A\", text: \"Good evening.\" }"));
        assert!(ts.contains("definition: \"Get \\\"quickly\\\"\""));
        assert!(ts.contains("category: \"verb\""));
        assert!(ts.contains("subcategory: \"present simple\""));
        // Entry without a category emits neither optional field
        let impatient = ts.split("word: \"Impatient\"").nth(1).unwrap();
        assert!(!impatient.contains("category"));
    }

    #[test]
    fn test_render_module() {
        let episodes = vec![render_typescript_episode(&sample_record(), "video_1", 1)];
        let module = render_typescript_module(&episodes);
        assert!(module.starts_with("import type { Episode } from '../types';"));
        assert!(module.contains("Total Episodes: 1"));
        assert!(module.contains("export const youtubeEpisodes: Episode[] = ["));
        assert!(module.trim_end().ends_with("export default youtubeEpisodes;"));
    }

    #[test]
    fn test_json_round_trip_of_parsed_record() {
        let record = parse("EnglishPod 9 - Advanced - Test\nKey Vocabulary\nGrab (verb): Get");
        let json = to_json(&[record.clone()]).unwrap();
        let back: Vec<TranscriptRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![record]);
        assert!(json.contains("\"keyVocabulary\""));
    }
}
