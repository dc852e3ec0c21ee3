//! Shared mock collaborators for integration tests
//!
//! Engines, compilers, and searchers with scripted behavior so the
//! resolution pipeline runs without a real `node` or `esbuild` on the
//! test host. Handles are cloneable for inspection after the resolver
//! takes ownership.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use buildconf::config::{FileSearch, ModuleSystem, SearchError};
use buildconf::runtime::{CompileError, EngineError, ModuleEngine, ScriptCompiler};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Engine returning a fixed value for every load
pub struct StaticEngine(pub Value);

impl ModuleEngine for StaticEngine {
    fn evaluate(&self, _path: &Path, _system: ModuleSystem) -> Result<Value, EngineError> {
        Ok(self.0.clone())
    }
}

/// Engine failing every load with a fixed message and diagnostic
pub struct FailingEngine {
    pub message: String,
    pub diagnostic: Option<String>,
}

impl ModuleEngine for FailingEngine {
    fn evaluate(&self, _path: &Path, _system: ModuleSystem) -> Result<Value, EngineError> {
        Err(EngineError::Load {
            message: self.message.clone(),
            diagnostic: self.diagnostic.clone(),
        })
    }
}

/// One observed engine load
#[derive(Debug, Clone)]
pub struct EngineCall {
    /// Path the engine was asked to load
    pub path: PathBuf,
    /// Module system requested
    pub system: ModuleSystem,
    /// Whether the path existed at load time
    pub existed: bool,
    /// File contents at load time, when readable
    pub contents: Option<String>,
}

/// Engine recording each load and returning a fixed value.
///
/// The recorded calls show which path and module system the loader
/// actually drove, and whether the artifact was on disk mid-load.
#[derive(Clone)]
pub struct RecordingEngine {
    value: Value,
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl RecordingEngine {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle onto the recorded calls
    pub fn calls(&self) -> Arc<Mutex<Vec<EngineCall>>> {
        Arc::clone(&self.calls)
    }
}

impl ModuleEngine for RecordingEngine {
    fn evaluate(&self, path: &Path, system: ModuleSystem) -> Result<Value, EngineError> {
        self.calls.lock().unwrap().push(EngineCall {
            path: path.to_path_buf(),
            system,
            existed: path.exists(),
            contents: std::fs::read_to_string(path).ok(),
        });
        Ok(self.value.clone())
    }
}

/// Compiler returning fixed code for every source
pub struct StaticCompiler(pub &'static str);

impl ScriptCompiler for StaticCompiler {
    fn compile(&self, _path: &Path, _target: ModuleSystem) -> Result<String, CompileError> {
        Ok(self.0.to_string())
    }
}

/// Compiler failing every source with a fixed diagnostic
pub struct FailingCompiler {
    pub message: String,
    pub diagnostic: Option<String>,
}

impl ScriptCompiler for FailingCompiler {
    fn compile(&self, path: &Path, _target: ModuleSystem) -> Result<String, CompileError> {
        Err(CompileError {
            path: path.to_path_buf(),
            message: self.message.clone(),
            diagnostic: self.diagnostic.clone(),
        })
    }
}

/// Compiler that must never run (non-script formats)
pub struct UnusedCompiler;

impl ScriptCompiler for UnusedCompiler {
    fn compile(&self, path: &Path, _target: ModuleSystem) -> Result<String, CompileError> {
        panic!("compiler invoked for {}", path.display());
    }
}

/// Search returning a fixed match list
pub struct FixedSearcher(pub Vec<PathBuf>);

impl FileSearch for FixedSearcher {
    fn search(&self, _root: &Path, _patterns: &[&str]) -> Result<Vec<PathBuf>, SearchError> {
        Ok(self.0.clone())
    }
}
