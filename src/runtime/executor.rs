//! Transient module execution
//!
//! Runs compiled source text as a module next to its original file:
//! write the artifact, invalidate its cache entry, load it, and delete
//! it on every exit path. Failures come back with every occurrence of
//! the artifact path rewritten to the original source path.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::ModuleSystem;

use super::cache::ModuleCache;
use super::engine::{default_export, EngineError, ModuleEngine};

/// A script failed during module load
#[derive(Debug, thiserror::Error)]
#[error("Failed to load {}: {}", path.display(), message)]
pub struct ExecutionFailure {
    /// The original source path; diagnostics reference this, never the
    /// artifact
    pub path: PathBuf,
    /// Failure message, artifact paths rewritten
    pub message: String,
    /// Full diagnostic body, artifact paths rewritten
    pub diagnostic: Option<String>,
}

impl ExecutionFailure {
    pub(crate) fn from_engine(path: &Path, err: &EngineError) -> Self {
        Self {
            path: path.to_path_buf(),
            message: err.to_string(),
            diagnostic: err.diagnostic().map(str::to_string),
        }
    }

    fn rewrite(mut self, substitution: &PathSubstitution) -> Self {
        self.message = substitution.apply(&self.message);
        self.diagnostic = self.diagnostic.map(|d| substitution.apply(&d));
        self
    }
}

/// Text substitution table applied to failure diagnostics.
///
/// Entries are applied in insertion order; each maps one text form of
/// the artifact path to the matching form of the original path.
#[derive(Debug, Default)]
pub struct PathSubstitution {
    entries: Vec<(String, String)>,
}

impl PathSubstitution {
    /// Table covering the artifact path in `file://` URL form and plain
    /// form. The URL entry goes first so it is rewritten whole.
    pub fn for_artifact(artifact: &Path, original: &Path) -> Self {
        let mut substitution = Self::default();
        substitution.map(file_url(artifact), file_url(original));
        substitution.map(
            artifact.display().to_string(),
            original.display().to_string(),
        );
        substitution
    }

    /// Add a from → to pair
    pub fn map(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.push((from.into(), to.into()));
    }

    /// Replace every occurrence of each mapped text
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (from, to) in &self.entries {
            out = out.replace(from, to);
        }
        out
    }
}

fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Artifact path for a source file: `{original}.compiled.{mjs|cjs}`.
///
/// Deterministic, so concurrent loads of the same source path would
/// race on the same file; one caller per path at a time is assumed.
pub fn artifact_path_for(source: &Path, system: ModuleSystem) -> PathBuf {
    PathBuf::from(format!(
        "{}.compiled.{}",
        source.display(),
        system.artifact_extension()
    ))
}

/// Scoped temporary artifact holding compiled code.
///
/// The file is written on creation and deleted when the guard drops,
/// covering success and failure paths alike.
struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    fn create(path: PathBuf, code: &str) -> io::Result<Self> {
        fs::write(&path, code)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("Failed to delete artifact {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Executes compiled source text as a transient module.
///
/// Owns the module cache; each execution invalidates its own artifact's
/// entry before loading and records the export value on success.
#[derive(Debug, Default)]
pub struct ModuleExecutor {
    cache: ModuleCache,
}

impl ModuleExecutor {
    /// Create an executor with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache of completed loads, keyed by artifact path
    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Execute `code` as a module standing in for `source_path`.
    ///
    /// The artifact never outlives this call. On failure, the error's
    /// message and diagnostic reference `source_path` instead of the
    /// artifact.
    pub fn execute<E: ModuleEngine>(
        &mut self,
        engine: &E,
        code: &str,
        source_path: &Path,
        system: ModuleSystem,
    ) -> Result<Value, ExecutionFailure> {
        let artifact_path = artifact_path_for(source_path, system);
        let substitution = PathSubstitution::for_artifact(&artifact_path, source_path);

        let artifact =
            TempArtifact::create(artifact_path.clone(), code).map_err(|e| ExecutionFailure {
                path: source_path.to_path_buf(),
                message: substitution.apply(&format!(
                    "Failed to write {}: {}",
                    artifact_path.display(),
                    e
                )),
                diagnostic: None,
            })?;

        self.cache.invalidate(artifact.path());
        tracing::debug!("Executing {} ({})", source_path.display(), system);

        let result = match engine.evaluate(artifact.path(), system) {
            Ok(value) => {
                let value = default_export(value);
                self.cache
                    .record(artifact.path().to_path_buf(), value.clone());
                Ok(value)
            }
            Err(e) => Err(ExecutionFailure::from_engine(source_path, &e).rewrite(&substitution)),
        };

        drop(artifact);
        result
    }
}
