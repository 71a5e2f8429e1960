/// Folder maintenance: file descriptions by level, rename after titles
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{discover_descriptions, sanitize_filename, video_number_from_filename};
use crate::description::{DescriptionParser, Level};
use crate::error::Result;

/// Result of filing descriptions into level folders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeSummary {
    /// Files copied per level folder
    pub copied: BTreeMap<String, usize>,
    /// Targets that already existed
    pub skipped: usize,
    pub failed: usize,
}

impl OrganizeSummary {
    pub fn total_copied(&self) -> usize {
        self.copied.values().sum()
    }
}

/// Result of renaming descriptions after their titles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenameSummary {
    /// (old, new) pairs, applied unless this was a dry run
    pub renames: Vec<(PathBuf, PathBuf)>,
    pub skipped: usize,
    /// Files that could not be read or renamed
    pub failed: usize,
    pub dry_run: bool,
}

/// Result of moving `Unknown` files into their level folders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixUnknownSummary {
    /// Files moved per level folder
    pub moved: BTreeMap<String, usize>,
    /// Files whose name does not reveal a level
    pub still_unknown: usize,
    /// Files removed from `Unknown` because the level folder already had them
    pub duplicates_removed: usize,
    pub failed: usize,
}

impl FixUnknownSummary {
    pub fn total_moved(&self) -> usize {
        self.moved.values().sum()
    }
}

/// Copy every description under `source` into `target/<level folder>/`.
///
/// The level comes from the parsed title line. Existing targets are left
/// alone, and anything already inside `target` is not picked up again.
pub async fn organize_by_level(
    parser: &DescriptionParser,
    source: &Path,
    target: &Path,
    extension: &str,
) -> Result<OrganizeSummary> {
    info!("📁 Organizing {} into {}", source.display(), target.display());

    for level in Level::ALL {
        tokio::fs::create_dir_all(target.join(level.folder_name())).await?;
    }

    let mut summary = OrganizeSummary::default();
    let files = discover_descriptions(source, extension)?;

    for path in files.iter().filter(|p| !p.starts_with(target)) {
        let Some(file_name) = path.file_name() else {
            continue;
        };

        let level = match tokio::fs::read_to_string(path).await {
            Ok(html) => parser.parse(&html).level,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Level::Unknown
            }
        };

        let destination = target.join(level.folder_name()).join(file_name);
        if destination.exists() {
            summary.skipped += 1;
            continue;
        }

        match tokio::fs::copy(path, &destination).await {
            Ok(_) => {
                *summary.copied.entry(level.folder_name().to_string()).or_insert(0) += 1;
                debug!("✅ {} → {}", path.display(), level);
            }
            Err(e) => {
                warn!("❌ Error copying {}: {}", path.display(), e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "📊 Copied {} files, skipped {} existing, {} failed",
        summary.total_copied(),
        summary.skipped,
        summary.failed
    );
    Ok(summary)
}

/// Rename `video_<n>*.<ext>` files in `dir` to `video_<nnn>_<title>.<ext>`.
///
/// Files without a number or without a title are skipped, as are files
/// that already carry their target name or whose target is taken. A file
/// that cannot be read or renamed is counted and the pass continues.
pub async fn rename_by_title(
    parser: &DescriptionParser,
    dir: &Path,
    extension: &str,
    dry_run: bool,
) -> Result<RenameSummary> {
    let mut summary = RenameSummary {
        dry_run,
        ..RenameSummary::default()
    };

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_description = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(extension))
                .unwrap_or(false);
        if is_description {
            files.push(path);
        }
    }
    files.sort();

    for path in files {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let Some(number) = video_number_from_filename(&file_name) else {
            debug!("⏭️ {} has no video number", file_name);
            summary.skipped += 1;
            continue;
        };

        let html = match tokio::fs::read_to_string(&path).await {
            Ok(html) => html,
            Err(e) => {
                warn!("❌ Failed to read {}: {}", file_name, e);
                summary.failed += 1;
                continue;
            }
        };
        let title = parser.parse(&html).title;
        if title.is_empty() {
            warn!("⚠️ Skipping {} - no title found", file_name);
            summary.skipped += 1;
            continue;
        }

        let new_name = format!("video_{:03}_{}.{}", number, sanitize_filename(&title), extension);
        if new_name == file_name {
            summary.skipped += 1;
            continue;
        }

        let new_path = dir.join(&new_name);
        let claimed = summary.renames.iter().any(|(_, target)| target == &new_path);
        if new_path.exists() || claimed {
            warn!("⚠️ Skipping {} - {} already exists", file_name, new_name);
            summary.skipped += 1;
            continue;
        }

        if dry_run {
            info!("📝 Would rename: {} → {}", file_name, new_name);
        } else if let Err(e) = tokio::fs::rename(&path, &new_path).await {
            warn!("❌ Error renaming {}: {}", file_name, e);
            summary.failed += 1;
            continue;
        } else {
            info!("✅ Renamed: {} → {}", file_name, new_name);
        }
        summary.renames.push((path, new_path));
    }

    Ok(summary)
}

/// Move files out of `target/Unknown/` using the level found in their names.
///
/// Meant to run after `rename_by_title`, once names carry the title. A file
/// whose level folder already holds the same name is deleted from
/// `Unknown`. The `Unknown` folder itself is removed once empty.
pub async fn fix_unknown(target: &Path, extension: &str) -> Result<FixUnknownSummary> {
    let unknown_dir = target.join(Level::Unknown.folder_name());
    let mut summary = FixUnknownSummary::default();

    if !unknown_dir.is_dir() {
        info!("✅ No {} folder found", unknown_dir.display());
        return Ok(summary);
    }

    let files = discover_descriptions(&unknown_dir, extension)?;
    info!("📊 Found {} files in {}", files.len(), unknown_dir.display());

    for path in files {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let name = file_name.to_string_lossy();

        let level = Level::from_filename(&name);
        if level == Level::Unknown {
            debug!("⚠️ Still unknown: {}", name);
            summary.still_unknown += 1;
            continue;
        }

        let level_dir = target.join(level.folder_name());
        tokio::fs::create_dir_all(&level_dir).await?;
        let destination = level_dir.join(file_name);

        if destination.exists() {
            debug!("⏭️ Already in {}: {}", level.folder_name(), name);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => summary.duplicates_removed += 1,
                Err(e) => {
                    warn!("❌ Error removing duplicate {}: {}", name, e);
                    summary.failed += 1;
                }
            }
            continue;
        }

        match tokio::fs::rename(&path, &destination).await {
            Ok(()) => {
                *summary.moved.entry(level.folder_name().to_string()).or_insert(0) += 1;
                debug!("✅ {} → {}", name, level);
            }
            Err(e) => {
                warn!("❌ Error moving {}: {}", name, e);
                summary.failed += 1;
            }
        }
    }

    // Only succeeds when nothing is left inside
    if tokio::fs::remove_dir(&unknown_dir).await.is_ok() {
        info!("🗑️ Removed empty {}", unknown_dir.display());
    }

    info!(
        "📊 Moved {} files, {} still unknown, {} duplicates removed, {} failed",
        summary.total_moved(),
        summary.still_unknown,
        summary.duplicates_removed,
        summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, title: &str) {
        std::fs::write(dir.join(name), format!("<span>{}</span><span>Conversation</span>", title)).unwrap();
    }

    #[tokio::test]
    async fn test_organize_by_level() {
        let source = TempDir::new().unwrap();
        write(source.path(), "video_1.html", "EnglishPod 1 - Elementary - Difficult Customer");
        write(source.path(), "video_2.html", "EnglishPod 2 - Upper Intermediate - Office");
        write(source.path(), "video_3.html", "Something else");
        let target = source.path().join("levels");

        let parser = DescriptionParser::new();
        let summary = organize_by_level(&parser, source.path(), &target, "html").await.unwrap();

        assert_eq!(summary.total_copied(), 3);
        assert!(target.join("Elementary/video_1.html").exists());
        assert!(target.join("Upper_Intermediate/video_2.html").exists());
        assert!(target.join("Unknown/video_3.html").exists());
        assert!(target.join("Advanced").is_dir());

        // Second run copies nothing and does not rescan the target folders
        let again = organize_by_level(&parser, source.path(), &target, "html").await.unwrap();
        assert_eq!(again.total_copied(), 0);
        assert_eq!(again.skipped, 3);
    }

    #[tokio::test]
    async fn test_rename_by_title() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "video_1.html", "EnglishPod 1 - Elementary - Difficult Customer");
        write(dir.path(), "video_2.html", "no title marker");
        write(dir.path(), "notes.html", "EnglishPod 5 - Advanced - X");

        let parser = DescriptionParser::new();

        let dry = rename_by_title(&parser, dir.path(), "html", true).await.unwrap();
        assert_eq!(dry.renames.len(), 1);
        assert_eq!(dry.skipped, 2);
        assert!(dir.path().join("video_1.html").exists());

        let live = rename_by_title(&parser, dir.path(), "html", false).await.unwrap();
        assert_eq!(live.renames.len(), 1);
        let expected = dir.path().join("video_001_EnglishPod_1_-_Elementary_-_Difficult_Customer.html");
        assert!(expected.exists());
        assert!(!dir.path().join("video_1.html").exists());

        let repeat = rename_by_title(&parser, dir.path(), "html", false).await.unwrap();
        assert!(repeat.renames.is_empty());
        assert_eq!(repeat.skipped, 3);
    }

    #[tokio::test]
    async fn test_rename_continues_past_unreadable_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("video_1.html"), [0xFF, 0xFE, 0x00, 0x41]).unwrap();
        write(dir.path(), "video_2.html", "EnglishPod 2 - Elementary - Dinner");

        let parser = DescriptionParser::new();
        let summary = rename_by_title(&parser, dir.path(), "html", false).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.renames.len(), 1);
        assert!(dir.path().join("video_1.html").exists());
        assert!(dir.path().join("video_002_EnglishPod_2_-_Elementary_-_Dinner.html").exists());
    }

    #[tokio::test]
    async fn test_rename_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let title = "EnglishPod 1 - Elementary - Difficult Customer";
        std::fs::write(dir.path().join("video_01.html"), format!("<span>{}</span><p>first</p>", title)).unwrap();
        std::fs::write(dir.path().join("video_1.html"), format!("<span>{}</span><p>second</p>", title)).unwrap();

        let parser = DescriptionParser::new();

        let dry = rename_by_title(&parser, dir.path(), "html", true).await.unwrap();
        assert_eq!(dry.renames.len(), 1);
        assert_eq!(dry.skipped, 1);

        let live = rename_by_title(&parser, dir.path(), "html", false).await.unwrap();
        assert_eq!(live.renames.len(), 1);
        assert_eq!(live.skipped, 1);

        let target = dir.path().join("video_001_EnglishPod_1_-_Elementary_-_Difficult_Customer.html");
        assert!(std::fs::read_to_string(target).unwrap().contains("first"));
        assert!(std::fs::read_to_string(dir.path().join("video_1.html")).unwrap().contains("second"));
    }

    #[tokio::test]
    async fn test_fix_unknown() {
        let root = TempDir::new().unwrap();
        let unknown = root.path().join("Unknown");
        let advanced = root.path().join("Advanced");
        std::fs::create_dir_all(&unknown).unwrap();
        std::fs::create_dir_all(&advanced).unwrap();

        std::fs::write(unknown.join("video_052_EnglishPod_52_-_Upper_Intermediate_-_Date.html"), "a").unwrap();
        std::fs::write(unknown.join("video_090_EnglishPod_90_-_Advanced_-_Debate.html"), "b").unwrap();
        std::fs::write(advanced.join("video_090_EnglishPod_90_-_Advanced_-_Debate.html"), "b").unwrap();
        std::fs::write(unknown.join("video_7.html"), "c").unwrap();

        let summary = fix_unknown(root.path(), "html").await.unwrap();

        assert_eq!(summary.total_moved(), 1);
        assert_eq!(summary.moved.get("Upper_Intermediate"), Some(&1));
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(summary.still_unknown, 1);
        assert!(root
            .path()
            .join("Upper_Intermediate/video_052_EnglishPod_52_-_Upper_Intermediate_-_Date.html")
            .exists());
        // video_7 keeps the folder alive
        assert!(unknown.join("video_7.html").exists());

        std::fs::remove_file(unknown.join("video_7.html")).unwrap();
        fix_unknown(root.path(), "html").await.unwrap();
        assert!(!unknown.exists());
    }

    #[tokio::test]
    async fn test_fix_unknown_without_folder() {
        let root = TempDir::new().unwrap();
        let summary = fix_unknown(root.path(), "html").await.unwrap();
        assert_eq!(summary.total_moved(), 0);
    }
}
