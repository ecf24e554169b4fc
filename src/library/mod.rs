//! Listing of exports already on disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::export::report::format_megabytes;

/// Entries shown before the listing is truncated.
pub const LISTING_LIMIT: usize = 10;

/// Kind of exported asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    /// Background clip.
    Video,
    /// Still frame.
    Still,
}

/// One exported file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportEntry {
    /// Path relative to the listed directory.
    pub path: PathBuf,
    /// File size in bytes.
    pub bytes: u64,
    /// Asset kind.
    pub kind: AssetKind,
}

fn asset_kind(path: &Path) -> Option<AssetKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" => Some(AssetKind::Video),
        "png" => Some(AssetKind::Still),
        _ => None,
    }
}

/// Exported `.mp4`/`.png` files under `dir`, sorted by path.
///
/// Hidden directories (the frame scratch area) are skipped. A missing `dir` lists nothing.
pub fn list_exports(dir: &Path) -> Vec<ExportEntry> {
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    let mut out = Vec::new();
    for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = asset_kind(entry.path()) else {
            continue;
        };
        let bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let path = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .to_path_buf();
        out.push(ExportEntry { path, bytes, kind });
    }
    out
}

/// Human-readable listing: the first `limit` entries, then `... and N more`.
pub fn render_listing(dir: &Path, entries: &[ExportEntry], limit: usize) -> String {
    let mut out = String::new();
    if entries.is_empty() {
        let _ = writeln!(out, "No exports found in {}", dir.display());
        return out;
    }

    let videos = entries.iter().filter(|e| e.kind == AssetKind::Video).count();
    let _ = writeln!(
        out,
        "Found {} exported files in {} ({} videos, {} stills):",
        entries.len(),
        dir.display(),
        videos,
        entries.len() - videos
    );
    for entry in entries.iter().take(limit) {
        let _ = writeln!(
            out,
            "  - {} ({})",
            entry.path.display(),
            format_megabytes(entry.bytes)
        );
    }
    if entries.len() > limit {
        let _ = writeln!(out, "  ... and {} more", entries.len() - limit);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/library/listing.rs"]
mod tests;
