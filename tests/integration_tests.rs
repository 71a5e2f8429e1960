use async_trait::async_trait;
use englishpod_transcripts::library::{organize_by_level, rename_by_title, sanitize_filename, ParseStatus};
use englishpod_transcripts::{
    parse, BatchProcessor, ConfigBuilder, DescriptionParser, Level, PronunciationEnricher,
    PronunciationLookup, Result, TranscriptRecord, VocabCategory,
};
use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;

const DIFFICULT_CUSTOMER: &str = r#"<div id="description" class="style-scope ytd-video-secondary-info-renderer">
<yt-formatted-string>
<span>EnglishPod 1 - Elementary - Difficult Customer</span><br>
<span>Conversation</span><br>
<span>A: Hi, can I help you?</span><br>
<span>B: Yes, I&#39;d like to return this shirt.</span><br>
<span>A: What&nbsp;seems to be the problem?</span><br>
<span>B: It&#39;s too small.</span><br>
<span>Key Vocabulary</span><br>
<span>Grab (principle verb, present simple): Get quickly</span><br>
<span>Return (verb): Give back</span><br>
<span>Supplementary Vocabulary</span><br>
<span>Would recommend: Suggest</span><br>
<span>Fancy (adjective): Elegant</span>
</yt-formatted-string>
</div>"#;

#[test]
fn test_full_description() {
    let record = parse(DIFFICULT_CUSTOMER);

    assert_eq!(record.title, "EnglishPod 1 - Elementary - Difficult Customer");
    assert_eq!(record.level, Level::Elementary);

    assert_eq!(record.dialogue.len(), 4);
    assert_eq!(record.dialogue[0].speaker, "A");
    assert_eq!(record.dialogue[1].text, "Yes, I'd like to return this shirt.");
    assert_eq!(record.dialogue[2].text, "What seems to be the problem?");

    assert_eq!(record.key_vocabulary.len(), 2);
    let grab = &record.key_vocabulary[0];
    assert_eq!(grab.word, "Grab");
    assert_eq!(grab.definition, "Get quickly");
    assert_eq!(grab.category, Some(VocabCategory::Verb));
    assert_eq!(grab.subcategory.as_deref(), Some("present simple"));

    assert_eq!(record.supplementary_vocabulary.len(), 2);
    let recommend = &record.supplementary_vocabulary[0];
    assert_eq!(recommend.word, "Would recommend");
    assert_eq!(recommend.definition, "Suggest");
    assert_eq!(recommend.category, None);
    assert_eq!(recommend.subcategory, None);
}

#[test]
fn test_one_turn_per_dialogue_line() {
    let lines: Vec<String> = (0..25)
        .map(|i| format!("<p>{}: line number {}</p>", if i % 2 == 0 { "A" } else { "B" }, i))
        .collect();
    let html = format!("<p>Conversation</p>{}", lines.join("\n"));

    let record = parse(&html);
    assert_eq!(record.dialogue.len(), 25);
    assert_eq!(record.dialogue[24].text, "line number 24");
}

#[test]
fn test_empty_and_unrecognized_input() {
    for input in ["", "   ", "<div></div>", "<p>just some words</p>"] {
        let record = parse(input);
        assert_eq!(record, TranscriptRecord::default());
        assert_eq!(record.level, Level::Unknown);
    }
}

#[test]
fn test_parsing_is_repeatable() {
    let parser = DescriptionParser::new();
    assert_eq!(parser.parse(DIFFICULT_CUSTOMER), parser.parse(DIFFICULT_CUSTOMER));
}

#[test]
fn test_headers_never_become_data() {
    let record = parse(DIFFICULT_CUSTOMER);
    for entry in record.vocabulary() {
        assert!(!entry.word.is_empty());
        assert!(!entry.word.to_lowercase().contains("vocabulary"));
    }
    assert!(record.dialogue.iter().all(|turn| turn.text != "Conversation"));
}

#[test]
fn test_record_json_shape() {
    let record = parse(DIFFICULT_CUSTOMER);
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["level"], "Elementary");
    assert_eq!(json["keyVocabulary"][0]["category"], "verb");
    assert!(json["supplementaryVocabulary"][0]["category"].is_null());
    assert!(json["keyVocabulary"][0].get("pronunciation").is_none());
}

#[tokio::test]
async fn test_batch_directory() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    fs::write(input.path().join("video_1.html"), DIFFICULT_CUSTOMER).await.unwrap();
    fs::write(
        input.path().join("video_2.html"),
        "<span>EnglishPod 2 - Intermediate - Rent</span><span>Conversation</span><span>A: Hello</span>",
    )
    .await
    .unwrap();
    fs::write(input.path().join("video_3.html"), "<p>nothing here</p>").await.unwrap();
    fs::write(input.path().join("notes.txt"), "ignored").await.unwrap();

    let config = ConfigBuilder::new().with_workers(2).enable_typescript(true).build();
    let processor = BatchProcessor::new(&config);
    let result = processor.process_directory(input.path(), output.path()).await.unwrap();

    assert_eq!(result.total, 3);
    assert_eq!(result.parsed, 2);
    assert_eq!(result.empty, 1);
    assert_eq!(result.failed, 0);
    assert_eq!(result.items[0].video_id, "video_1");
    assert_eq!(result.items[2].status, ParseStatus::Empty);

    let saved: Vec<TranscriptRecord> =
        serde_json::from_str(&fs::read_to_string(output.path().join("episodes.json")).await.unwrap())
            .unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[1].level, Level::Intermediate);

    let typescript = fs::read_to_string(output.path().join("episodes.ts")).await.unwrap();
    assert!(typescript.contains("Difficult Customer"));
    assert!(output.path().join("batch_results.json").exists());
}

#[tokio::test]
async fn test_organize_and_rename() {
    let source = TempDir::new().unwrap();
    let levels = TempDir::new().unwrap();
    fs::write(source.path().join("video_1.html"), DIFFICULT_CUSTOMER).await.unwrap();

    let parser = DescriptionParser::new();

    let summary = organize_by_level(&parser, source.path(), levels.path(), "html").await.unwrap();
    assert_eq!(summary.total_copied(), 1);
    assert!(levels.path().join("Elementary").join("video_1.html").exists());

    // A second pass leaves existing copies alone
    let again = organize_by_level(&parser, source.path(), levels.path(), "html").await.unwrap();
    assert_eq!(again.total_copied(), 0);
    assert_eq!(again.skipped, 1);

    let expected = format!(
        "video_001_{}.html",
        sanitize_filename("EnglishPod 1 - Elementary - Difficult Customer")
    );

    let dry = rename_by_title(&parser, source.path(), "html", true).await.unwrap();
    assert_eq!(dry.renames.len(), 1);
    assert!(source.path().join("video_1.html").exists());

    let live = rename_by_title(&parser, source.path(), "html", false).await.unwrap();
    assert_eq!(live.renames.len(), 1);
    assert!(source.path().join(&expected).exists());
    assert!(!source.path().join("video_1.html").exists());
}

struct StaticLookup;

#[async_trait]
impl PronunciationLookup for StaticLookup {
    async fn lookup(&self, word: &str) -> Result<Option<String>> {
        Ok(match word {
            "Grab" => Some("ɡræb".to_string()),
            "Return" => Some("rɪˈtɜːrn".to_string()),
            _ => None,
        })
    }
}

#[tokio::test]
async fn test_pronunciation_enrichment() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("episodes.json");
    let records = vec![parse(DIFFICULT_CUSTOMER)];
    fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).await.unwrap();

    let enricher = PronunciationEnricher::new(StaticLookup, Duration::ZERO);
    let stats = enricher.enrich_file(&path, false).await.unwrap();

    assert_eq!(stats.total, 4);
    assert_eq!(stats.added, 2);
    assert_eq!(stats.failed, 2);

    let saved: Vec<TranscriptRecord> =
        serde_json::from_str(&fs::read_to_string(&path).await.unwrap()).unwrap();
    assert_eq!(saved[0].key_vocabulary[0].pronunciation.as_deref(), Some("ɡræb"));
    assert_eq!(saved[0].supplementary_vocabulary[0].pronunciation, None);

    // Running again only retries the words that are still missing
    let second = enricher.enrich_file(&path, false).await.unwrap();
    assert_eq!(second.already_present, 2);
    assert_eq!(second.added, 0);
}
