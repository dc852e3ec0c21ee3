//! Error taxonomy for config resolution

use std::path::PathBuf;

use crate::runtime::{CompileError, ExecutionFailure};

use super::locate::SearchError;

/// Errors surfaced by config resolution.
///
/// Every variant is fatal to the resolution: the caller logs and
/// terminates. None are retried, and no fallback configuration is
/// substituted on failure.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// An explicitly supplied config path does not exist on disk
    #[error("Config file not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Default-pattern search failed
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Config file could not be read
    #[error("Failed to read {}: {}", path.display(), source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structured data is not valid under the permissive grammar
    #[error("Failed to parse {}: {}", path.display(), source)]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },

    /// Path suffix does not map to a known format
    #[error("Unsupported config extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),

    /// The external compiler failed
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A script failed during module load
    #[error(transparent)]
    Execution(#[from] ExecutionFailure),
}

impl ConfigError {
    /// Diagnostic body beyond the message, when the failure carries one
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            ConfigError::Compile(e) => e.diagnostic.as_deref(),
            ConfigError::Execution(e) => e.diagnostic.as_deref(),
            _ => None,
        }
    }
}
