//! Build configuration resolution
//!
//! Locates the project config file, loads it by classified format,
//! applies the mode override set, and attaches provenance:
//! 1. Explicit path or default-pattern search
//! 2. Format dispatch (data, plain script, typed script)
//! 3. Mode merge
//! 4. Source digest and timestamp

mod error;
mod format;
mod loader;
mod locate;
mod manifest;
mod merge;

pub use error::ConfigError;
pub use format::{classify, ConfigFormat, ModuleSystem};
pub use loader::ConfigLoader;
pub use locate::{
    locate_config_file, FileSearch, GlobSearcher, SearchError, DEFAULT_CONFIG_PATTERNS,
};
pub use manifest::PackageManifest;
pub use merge::apply_mode;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use crate::runtime::{EsbuildCompiler, ModuleEngine, NodeEngine, ScriptCompiler};

/// Options for one resolution call
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Project root directory
    pub root: PathBuf,

    /// Explicit config path; relative paths resolve against the root
    pub config_path: Option<PathBuf>,

    /// Mode name selecting an override set (empty for none)
    pub mode: String,
}

/// The config file a resolution loaded
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSource {
    /// Path the config was loaded from
    pub path: PathBuf,

    /// Classified source format
    pub format: ConfigFormat,

    /// SHA-256 digest of the raw file bytes
    pub digest: String,
}

/// A resolved configuration with provenance
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// The merged configuration object
    pub config: Value,

    /// Source file (None when the default applied)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ConfigSource>,

    /// Mode applied (None when empty)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// When this resolution happened
    pub created_at: DateTime<Utc>,
}

/// Default configuration when no config file exists
fn default_config() -> Value {
    json!({ "plugins": [] })
}

/// Drives locate, load, and merge for a project
#[derive(Debug)]
pub struct ConfigResolver<S, C, E> {
    searcher: S,
    loader: ConfigLoader<C, E>,
}

impl ConfigResolver<GlobSearcher, EsbuildCompiler, NodeEngine> {
    /// Resolver over the production collaborators
    pub fn with_defaults() -> Self {
        Self::new(
            GlobSearcher,
            EsbuildCompiler::default(),
            NodeEngine::default(),
        )
    }
}

impl<S, C, E> ConfigResolver<S, C, E>
where
    S: FileSearch,
    C: ScriptCompiler,
    E: ModuleEngine,
{
    /// Create a resolver over the given collaborators
    pub fn new(searcher: S, compiler: C, engine: E) -> Self {
        Self {
            searcher,
            loader: ConfigLoader::new(compiler, engine),
        }
    }

    /// Loader driving format dispatch
    pub fn loader(&self) -> &ConfigLoader<C, E> {
        &self.loader
    }

    /// Resolve the project configuration.
    ///
    /// With no config file present, and none explicitly requested, the
    /// default empty-plugins configuration comes back with no source;
    /// configuration is optional. An explicitly requested path must
    /// exist.
    pub fn resolve(&mut self, options: &ResolveOptions) -> Result<ResolvedConfig, ConfigError> {
        let explicit = options.config_path.as_deref();
        let located = locate_config_file(explicit, &options.root, &self.searcher)?;

        let path = match located {
            Some(path) => path,
            None => {
                tracing::debug!("No config file found under {}", options.root.display());
                return Ok(ResolvedConfig {
                    config: default_config(),
                    source: None,
                    mode: mode_of(options),
                    created_at: Utc::now(),
                });
            }
        };

        if explicit.is_some() && !path.exists() {
            return Err(ConfigError::PathNotFound(path));
        }

        let manifest = PackageManifest::discover(&options.root);
        let format = classify(&path, &manifest)
            .ok_or_else(|| ConfigError::UnsupportedExtension(path.clone()))?;

        let bytes = fs::read(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            source: e,
        })?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let raw = self.loader.load(&path, &manifest)?;
        let merged = apply_mode(&options.mode, raw);

        Ok(ResolvedConfig {
            config: merged,
            source: Some(ConfigSource { path, format, digest }),
            mode: mode_of(options),
            created_at: Utc::now(),
        })
    }
}

fn mode_of(options: &ResolveOptions) -> Option<String> {
    if options.mode.is_empty() {
        None
    } else {
        Some(options.mode.clone())
    }
}
