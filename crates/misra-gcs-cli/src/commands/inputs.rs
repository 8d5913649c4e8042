//! Input list files: warnings, source list and GRP.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolves `path` against the workspace root unless it is absolute.
#[must_use]
pub fn workspace_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Reads the non-blank lines of a list file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_lines(root: &Path, path: &Path) -> Result<Vec<String>> {
    let full = workspace_path(root, path);
    let content = std::fs::read(&full)
        .with_context(|| format!("Failed to read input file: {}", full.display()))?;
    let lines: Vec<String> = String::from_utf8_lossy(&content)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(String::from)
        .collect();
    tracing::debug!("Read {} lines from {}", lines.len(), full.display());
    Ok(lines)
}

/// Expands source list entries into workspace-relative file names.
///
/// Entries containing glob metacharacters are matched against the
/// workspace; other entries are kept even if the file does not exist, so the
/// engine can report it.
#[must_use]
pub fn source_files(root: &Path, entries: &[String]) -> Vec<String> {
    let mut files = Vec::new();
    for entry in entries.iter().map(|e| e.trim()) {
        if !entry.contains(['*', '?', '[']) {
            files.push(relative_to_root(root, Path::new(entry)));
            continue;
        }

        let pattern = workspace_path(root, Path::new(entry));
        let matches = match glob::glob(&pattern.to_string_lossy()) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Invalid source pattern \"{entry}\": {e}");
                continue;
            }
        };
        let before = files.len();
        for path in matches {
            match path {
                Ok(path) if path.is_file() => files.push(relative_to_root(root, &path)),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping {}: {}", e.path().display(), e.error()),
            }
        }
        if files.len() == before {
            tracing::warn!("Source pattern \"{entry}\" matched no files");
        }
    }
    files
}

/// `path` relative to `root` if it lies beneath it, else unchanged.
#[must_use]
pub fn relative_to_root(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
