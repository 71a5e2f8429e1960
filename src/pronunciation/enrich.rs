use super::{clean_word, PronunciationLookup};
use crate::description::{TranscriptRecord, VocabularyEntry};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters for one enrichment run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentStats {
    pub total: usize,
    pub already_present: usize,
    pub added: usize,
    pub failed: usize,
}

impl EnrichmentStats {
    pub fn merge(&mut self, other: EnrichmentStats) {
        self.total += other.total;
        self.already_present += other.already_present;
        self.added += other.added;
        self.failed += other.failed;
    }
}

/// Attaches pronunciations to vocabulary entries that lack one
pub struct PronunciationEnricher<L: PronunciationLookup> {
    lookup: L,
    delay: Duration,
}

impl<L: PronunciationLookup> PronunciationEnricher<L> {
    pub fn new(lookup: L, delay: Duration) -> Self {
        Self { lookup, delay }
    }

    /// Enrich key then supplementary vocabulary. Existing non-empty
    /// pronunciations are never touched, so repeated runs are no-ops.
    pub async fn enrich_record(&self, record: &mut TranscriptRecord) -> EnrichmentStats {
        let mut stats = EnrichmentStats::default();
        for entry in record.vocabulary_mut() {
            self.enrich_entry(entry, &mut stats).await;
        }
        stats
    }

    pub async fn enrich_records(&self, records: &mut [TranscriptRecord]) -> EnrichmentStats {
        let mut stats = EnrichmentStats::default();
        for record in records.iter_mut() {
            let title = if record.title.is_empty() { "Untitled" } else { record.title.as_str() };
            info!("📚 {}", title);
            stats.merge(self.enrich_record(record).await);
        }
        stats
    }

    async fn enrich_entry(&self, entry: &mut VocabularyEntry, stats: &mut EnrichmentStats) {
        stats.total += 1;

        if entry.has_pronunciation() {
            stats.already_present += 1;
            debug!("⏭️ '{}' already has pronunciation", clean_word(&entry.word));
            return;
        }

        match self.lookup.lookup(&entry.word).await {
            Ok(Some(pronunciation)) => {
                debug!("✓ '{}' → /{}/", entry.word, pronunciation);
                entry.pronunciation = Some(pronunciation);
                stats.added += 1;
            }
            Ok(None) => {
                debug!("⚠️ No pronunciation found for '{}'", entry.word);
                stats.failed += 1;
            }
            Err(e) => {
                warn!("❌ Error fetching pronunciation for '{}': {}", entry.word, e);
                stats.failed += 1;
            }
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Enrich a records JSON file in place.
    ///
    /// A dry run only reports. Otherwise the original file is copied to
    /// `<name>.json.backup` before the enriched records are written.
    pub async fn enrich_file(&self, path: &Path, dry_run: bool) -> Result<EnrichmentStats> {
        let content = tokio::fs::read_to_string(path).await?;
        let mut records: Vec<TranscriptRecord> = serde_json::from_str(&content)?;

        let stats = self.enrich_records(&mut records).await;
        info!(
            "📊 {} words: {} already present, {} added, {} failed",
            stats.total, stats.already_present, stats.added, stats.failed
        );

        if dry_run {
            info!("ℹ️ Dry run - no changes saved");
            return Ok(stats);
        }

        let backup = backup_path(path);
        tokio::fs::write(&backup, &content).await?;
        info!("💾 Backup written to: {}", backup.display());

        tokio::fs::write(path, serde_json::to_string_pretty(&records)?).await?;
        info!("💾 Saved enriched records to: {}", path.display());

        Ok(stats)
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".backup");
    PathBuf::from(name)
}
