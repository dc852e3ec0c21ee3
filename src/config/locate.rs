//! Config file location
//!
//! Turns an explicit path or a default-pattern search into a single
//! config path.

use globset::{Glob, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default patterns probed for a config file in the project root
pub const DEFAULT_CONFIG_PATTERNS: &[&str] =
    &["build.config.{js,mjs,cjs,ts,mts,cts,json,json5,jsonc}"];

/// Errors for config file search
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Glob pattern error: {0}")]
    GlobError(#[from] globset::Error),
}

/// Search collaborator used for default config discovery
pub trait FileSearch {
    /// Return files matching `patterns` under `root`, in absolute form
    fn search(&self, root: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>, SearchError>;
}

/// Glob-based search over the root directory.
///
/// Patterns are matched against file names one level below the root.
/// Results come back in file-name order, so the first match is stable
/// for a fixed directory state.
#[derive(Debug, Default)]
pub struct GlobSearcher;

impl FileSearch for GlobSearcher {
    fn search(&self, root: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>, SearchError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        let glob_set = builder.build()?;

        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };

        let mut matches = Vec::new();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if glob_set.is_match(entry.file_name()) {
                matches.push(entry.path().to_path_buf());
            }
        }

        Ok(matches)
    }
}

/// Resolve the config file path for a project.
///
/// An explicit path is used as-is when absolute, else joined onto the
/// root. No existence check happens here; that is the caller's
/// responsibility. With no explicit path, the search collaborator runs
/// the default patterns and the first match wins; `None` means no
/// config applies.
pub fn locate_config_file(
    explicit: Option<&Path>,
    root: &Path,
    searcher: &dyn FileSearch,
) -> Result<Option<PathBuf>, SearchError> {
    if let Some(path) = explicit {
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };
        return Ok(Some(resolved));
    }

    let matches = searcher.search(root, DEFAULT_CONFIG_PATTERNS)?;
    Ok(matches.into_iter().next())
}
