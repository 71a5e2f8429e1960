use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use super::{discover_descriptions, title_from_filename, video_id_from_filename};
use crate::config::Config;
use crate::description::{DescriptionParser, Level, TranscriptRecord};
use crate::error::Result;
use crate::export;

/// Outcome of parsing one description file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileParseResult {
    pub path: PathBuf,
    pub filename: String,
    pub video_id: String,
    pub status: ParseStatus,
    pub error_message: Option<String>,
    pub title: String,
    pub dialogue_lines: usize,
    pub key_vocabulary: usize,
    pub supplementary_vocabulary: usize,
    pub skipped_lines: usize,
    /// Title (and possibly level) taken from the file name
    #[serde(default)]
    pub title_recovered: bool,
    #[serde(skip)]
    pub record: Option<TranscriptRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParseStatus {
    /// Something was recognized
    Parsed,
    /// Readable, but nothing recognized
    Empty,
    /// Could not be read
    Failed,
}

/// Overall batch results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub total: usize,
    pub parsed: usize,
    pub empty: usize,
    pub failed: usize,
    pub total_time: Duration,
    pub items: Vec<FileParseResult>,
}

impl BatchResult {
    /// Records of every readable file, in discovery order
    pub fn records(&self) -> Vec<&TranscriptRecord> {
        self.items.iter().filter_map(|item| item.record.as_ref()).collect()
    }
}

/// Parses directories of descriptions with a bounded worker pool
pub struct BatchProcessor {
    parser: Arc<DescriptionParser>,
    extension: String,
    records_file: String,
    typescript: bool,
    worker_semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl BatchProcessor {
    pub fn new(config: &Config) -> Self {
        let parser = DescriptionParser::new().with_title_marker(config.parser.title_marker.clone());
        Self::with_parser(parser, config)
    }

    pub fn with_parser(parser: DescriptionParser, config: &Config) -> Self {
        let max_workers = config.library.max_workers.max(1);
        info!("🔧 Initializing BatchProcessor with {} workers", max_workers);

        Self {
            parser: Arc::new(parser),
            extension: config.library.extension.clone(),
            records_file: config.output.records_file.clone(),
            typescript: config.output.typescript,
            worker_semaphore: Arc::new(Semaphore::new(max_workers)),
            max_concurrent: max_workers,
        }
    }

    /// Parse every description under `input_dir` and write the outputs
    pub async fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchResult> {
        let start_time = Instant::now();

        info!("🚀 Starting batch parsing...");
        info!("📁 Input: {}", input_dir.display());
        info!("📂 Output: {}", output_dir.display());

        tokio::fs::create_dir_all(output_dir).await?;

        let paths = discover_descriptions(input_dir, &self.extension)?;
        if paths.is_empty() {
            warn!("No .{} files found in {}", self.extension, input_dir.display());
        } else {
            info!("📄 Found {} description files", paths.len());
        }

        let items = self.process_files(paths).await;
        let batch = summarize(items, start_time.elapsed());

        self.write_outputs(&batch, output_dir).await?;

        info!(
            "🎉 Parsed {} of {} files ({} empty, {} failed) in {:.2}s",
            batch.parsed,
            batch.total,
            batch.empty,
            batch.failed,
            batch.total_time.as_secs_f64()
        );

        Ok(batch)
    }

    /// Parse files concurrently; results come back in input order
    pub async fn process_files(&self, paths: Vec<PathBuf>) -> Vec<FileParseResult> {
        let (tx, mut rx) = mpsc::channel(self.max_concurrent);
        let total_files = paths.len();

        for (index, path) in paths.into_iter().enumerate() {
            let parser = Arc::clone(&self.parser);
            let semaphore = Arc::clone(&self.worker_semaphore);
            let tx = tx.clone();

            tokio::spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        debug!("📄 Parsing file {}/{}: {}", index + 1, total_files, path.display());
                        parse_file(&parser, &path).await
                    }
                    Err(e) => failed_result(&path, format!("worker pool closed: {}", e)),
                };

                if let Err(e) = tx.send((index, result)).await {
                    error!("Failed to send result: {}", e);
                }
            });
        }

        // Drop the original sender to close the channel when all tasks complete
        drop(tx);

        let mut results = Vec::with_capacity(total_files);
        while let Some((index, result)) = rx.recv().await {
            match result.status {
                ParseStatus::Parsed => debug!("✅ {}: {}", result.filename, result.title),
                ParseStatus::Empty => warn!("⚠️ Nothing recognized in {}", result.filename),
                ParseStatus::Failed => warn!(
                    "❌ Failed: {} - {}",
                    result.filename,
                    result.error_message.as_deref().unwrap_or("Unknown error")
                ),
            }
            results.push((index, result));
        }

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }

    async fn write_outputs(&self, batch: &BatchResult, output_dir: &Path) -> Result<()> {
        let records: Vec<TranscriptRecord> = batch.records().into_iter().cloned().collect();

        let records_path = output_dir.join(&self.records_file);
        tokio::fs::write(&records_path, export::to_json(&records)?).await?;
        info!("💾 Records saved to: {}", records_path.display());

        let results_path = output_dir.join("batch_results.json");
        tokio::fs::write(&results_path, serde_json::to_string_pretty(batch)?).await?;
        debug!("💾 Batch summary saved to: {}", results_path.display());

        if self.typescript {
            let episodes: Vec<String> = batch
                .items
                .iter()
                .filter(|item| item.status == ParseStatus::Parsed)
                .filter_map(|item| item.record.as_ref().map(|record| (item, record)))
                .enumerate()
                .map(|(i, (item, record))| export::render_typescript_episode(record, &item.video_id, i + 1))
                .collect();

            let ts_path = output_dir.join("episodes.ts");
            tokio::fs::write(&ts_path, export::render_typescript_module(&episodes)).await?;
            info!("📝 TypeScript module with {} episodes saved to: {}", episodes.len(), ts_path.display());
        }

        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

async fn parse_file(parser: &DescriptionParser, path: &Path) -> FileParseResult {
    let html = match tokio::fs::read_to_string(path).await {
        Ok(html) => html,
        Err(e) => return failed_result(path, e.to_string()),
    };

    let outcome = parser.parse_report(&html);
    let filename = file_name(path);
    let mut record = outcome.record;
    let status = if record.is_empty() { ParseStatus::Empty } else { ParseStatus::Parsed };
    let title_recovered = recover_title(&mut record, &filename);

    FileParseResult {
        path: path.to_path_buf(),
        video_id: video_id_from_filename(&filename),
        filename,
        status,
        error_message: None,
        title: record.title.clone(),
        dialogue_lines: record.dialogue.len(),
        key_vocabulary: record.key_vocabulary.len(),
        supplementary_vocabulary: record.supplementary_vocabulary.len(),
        skipped_lines: outcome.skipped_lines,
        title_recovered,
        record: Some(record),
    }
}

/// Fill a missing title from a renamed file's name, and the level with it
/// when the description did not announce one
fn recover_title(record: &mut TranscriptRecord, filename: &str) -> bool {
    if !record.title.is_empty() {
        return false;
    }
    let Some(title) = title_from_filename(filename) else {
        return false;
    };

    info!("⚠️ Recovered title from file name: {}", title);
    if record.level == Level::Unknown {
        record.level = Level::detect(&title);
    }
    record.title = title;
    true
}

fn failed_result(path: &Path, message: String) -> FileParseResult {
    let filename = file_name(path);
    FileParseResult {
        path: path.to_path_buf(),
        video_id: video_id_from_filename(&filename),
        filename,
        status: ParseStatus::Failed,
        error_message: Some(message),
        title: String::new(),
        dialogue_lines: 0,
        key_vocabulary: 0,
        supplementary_vocabulary: 0,
        skipped_lines: 0,
        title_recovered: false,
        record: None,
    }
}

fn summarize(items: Vec<FileParseResult>, total_time: Duration) -> BatchResult {
    let count = |status: ParseStatus| items.iter().filter(|item| item.status == status).count();

    BatchResult {
        total: items.len(),
        parsed: count(ParseStatus::Parsed),
        empty: count(ParseStatus::Empty),
        failed: count(ParseStatus::Failed),
        total_time,
        items,
    }
}
