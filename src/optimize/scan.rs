//! WebP file discovery

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Recursively finds `.webp` files (any case) under `dir`, sorted
///
/// Hidden directories and `node_modules` are skipped. Unreadable entries are
/// logged and skipped.
pub fn find_webp_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && has_webp_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!("Found {} WebP files under {}", files.len(), dir.display());
    files
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
        .unwrap_or(false)
}

fn has_webp_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("webp"))
        .unwrap_or(false)
}
