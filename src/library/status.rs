/// Extraction status: which video numbers are missing per folder
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

use super::{discover_descriptions, video_number_from_filename};
use crate::config::FolderExpectation;
use crate::error::Result;

/// Status of one folder against its expected video numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderStatus {
    pub name: String,
    pub exists: bool,
    pub expected: usize,
    /// Distinct expected numbers present in the folder
    pub found: usize,
    pub missing: Vec<u32>,
}

impl FolderStatus {
    pub fn is_complete(&self) -> bool {
        self.exists && self.missing.is_empty()
    }
}

/// Status of every configured folder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusReport {
    pub folders: Vec<FolderStatus>,
}

impl StatusReport {
    pub fn total_expected(&self) -> usize {
        self.folders.iter().map(|f| f.expected).sum()
    }

    pub fn total_missing(&self) -> usize {
        self.folders.iter().map(|f| f.missing.len()).sum()
    }

    pub fn total_found(&self) -> usize {
        self.total_expected() - self.total_missing()
    }

    /// Share of expected videos present, in percent
    pub fn completion(&self) -> f64 {
        match self.total_expected() {
            0 => 100.0,
            expected => self.total_found() as f64 * 100.0 / expected as f64,
        }
    }

    /// Folders with at least one missing video
    pub fn incomplete(&self) -> impl Iterator<Item = &FolderStatus> {
        self.folders.iter().filter(|f| !f.missing.is_empty())
    }
}

/// Compare the `video_<n>` files in `base/<name>` with the expected range.
/// A missing folder reports every expected number as missing.
pub fn check_folder(base: &Path, expectation: &FolderExpectation, extension: &str) -> Result<FolderStatus> {
    let dir = base.join(&expectation.name);
    let expected: Vec<u32> = (expectation.start..expectation.start.saturating_add(expectation.count)).collect();

    if !dir.is_dir() {
        warn!("❌ {}: folder doesn't exist", expectation.name);
        return Ok(FolderStatus {
            name: expectation.name.clone(),
            exists: false,
            expected: expected.len(),
            found: 0,
            missing: expected,
        });
    }

    let present: BTreeSet<u32> = discover_descriptions(&dir, extension)?
        .iter()
        .filter_map(|path| path.file_name())
        .filter_map(|name| video_number_from_filename(&name.to_string_lossy()))
        .collect();

    let missing: Vec<u32> = expected.iter().copied().filter(|n| !present.contains(n)).collect();

    Ok(FolderStatus {
        name: expectation.name.clone(),
        exists: true,
        expected: expected.len(),
        found: expected.len() - missing.len(),
        missing,
    })
}

/// Check every folder and log a summary
pub fn status_report(base: &Path, folders: &[FolderExpectation], extension: &str) -> Result<StatusReport> {
    let mut report = StatusReport::default();

    for expectation in folders {
        let status = check_folder(base, expectation, extension)?;
        if status.is_complete() {
            info!("📁 {}: {}/{} ✅ complete", status.name, status.found, status.expected);
        } else if status.exists {
            let preview: Vec<String> = status.missing.iter().take(20).map(u32::to_string).collect();
            info!(
                "📁 {}: {}/{}, missing {}: {}{}",
                status.name,
                status.found,
                status.expected,
                status.missing.len(),
                preview.join(", "),
                if status.missing.len() > 20 { ", ..." } else { "" }
            );
        }
        report.folders.push(status);
    }

    info!(
        "📊 Found {} of {} videos ({:.1}%), {} missing",
        report.total_found(),
        report.total_expected(),
        report.completion(),
        report.total_missing()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_folder() {
        let base = TempDir::new().unwrap();
        let dir = base.path().join("Episode_02");
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["video_101.html", "video_103_EnglishPod_103.html", "video_150.html", "notes.html"] {
            std::fs::write(dir.join(name), "x").unwrap();
        }

        let status = check_folder(base.path(), &FolderExpectation::new("Episode_02", 101, 4), "html").unwrap();

        assert!(status.exists);
        assert_eq!(status.expected, 4);
        assert_eq!(status.found, 2);
        assert_eq!(status.missing, vec![102, 104]);
        assert!(!status.is_complete());
    }

    #[test]
    fn test_missing_folder() {
        let base = TempDir::new().unwrap();
        let status = check_folder(base.path(), &FolderExpectation::new("Advanced", 1, 3), "html").unwrap();
        assert!(!status.exists);
        assert_eq!(status.missing, vec![1, 2, 3]);
    }

    #[test]
    fn test_status_report_totals() {
        let base = TempDir::new().unwrap();
        let dir = base.path().join("Elementary");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("video_1.html"), "x").unwrap();
        std::fs::write(dir.join("video_2.html"), "x").unwrap();

        let folders = vec![
            FolderExpectation::new("Elementary", 1, 2),
            FolderExpectation::new("Advanced", 1, 2),
        ];
        let report = status_report(base.path(), &folders, "html").unwrap();

        assert_eq!(report.total_expected(), 4);
        assert_eq!(report.total_found(), 2);
        assert_eq!(report.total_missing(), 2);
        assert!((report.completion() - 50.0).abs() < f64::EPSILON);
        assert_eq!(report.incomplete().map(|f| f.name.as_str()).collect::<Vec<_>>(), vec!["Advanced"]);
    }
}
