/// Description library management
///
/// Discovers captured description files, parses them in batches and keeps
/// the folder layout tidy (per-level folders, title-based file names).

pub mod batch;
pub mod organize;
pub mod status;

// Re-export main types
pub use batch::{BatchProcessor, BatchResult, FileParseResult, ParseStatus};
pub use organize::{
    fix_unknown, organize_by_level, rename_by_title, FixUnknownSummary, OrganizeSummary, RenameSummary,
};
pub use status::{check_folder, status_report, FolderStatus, StatusReport};

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

static VIDEO_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"video_(\d+)").unwrap());
static TITLED_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^video_\d+_").unwrap());
static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// Recursively find files with the given extension, sorted by path
pub fn discover_descriptions(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Video number from names like `video_12.html` or `video_012_Title.html`
pub fn video_number_from_filename(filename: &str) -> Option<u32> {
    VIDEO_NUMBER
        .captures(filename)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// `video_<n>` when the name carries a video number, otherwise the file stem
pub fn video_id_from_filename(filename: &str) -> String {
    match video_number_from_filename(filename) {
        Some(number) => format!("video_{}", number),
        None => Path::new(filename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.to_string()),
    }
}

/// Turn a title into a safe file name fragment
pub fn sanitize_filename(title: &str) -> String {
    let safe = UNSAFE_CHARS.replace_all(title, "");
    let safe = WHITESPACE.replace_all(&safe, "_");
    let safe = UNDERSCORES.replace_all(&safe, "_");
    safe.trim_matches('_').to_string()
}

/// Title carried by a renamed file: `video_083_EnglishPod_83_-_Rent.html`
/// gives `EnglishPod 83 - Rent`. Names without the `video_<n>_` prefix or
/// with a title of five characters or fewer give `None`.
pub fn title_from_filename(filename: &str) -> Option<String> {
    let stem = Path::new(filename).file_stem()?.to_string_lossy();
    let rest = TITLED_PREFIX.find(&stem).map(|m| &stem[m.end()..])?;
    let title = rest.replace('_', " ").trim().to_string();

    if title.chars().count() > 5 {
        Some(title)
    } else {
        None
    }
}
