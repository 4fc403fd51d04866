//! Candidate file discovery under the dataset root.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::DbdIconsError;

/// Lists the regular files under `root`, recursively.
///
/// Within each directory, files come first in file-name order, followed by
/// the contents of each subdirectory in name order. Hidden entries (names
/// starting with `.` or `__`) are skipped along with everything below them.
/// Symlinks are followed.
pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>, DbdIconsError> {
    if !root.is_dir() {
        return Err(DbdIconsError::Discovery {
            path: root.to_path_buf(),
            message: "expected a directory containing the annotation files and images"
                .to_string(),
        });
    }

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by(|a, b| {
            (a.file_type().is_dir(), a.file_name()).cmp(&(b.file_type().is_dir(), b.file_name()))
        })
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| DbdIconsError::Discovery {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), files = files.len(), "discovered candidate files");
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || name.starts_with("__"))
}
