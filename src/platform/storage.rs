use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

/// Enumerates the entry names of a directory.
pub trait Storage {
    fn list_directory(&self, path: &Path) -> Result<Vec<String>>;
}

/// Lists regular files directly under a mounted directory, sorted by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("failed to list {}", path.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_owned()),
                None => debug!(path = %entry.path().display(), "skipping non-UTF-8 entry"),
            }
        }
        Ok(names)
    }
}
