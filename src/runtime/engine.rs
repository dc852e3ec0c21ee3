//! Module engine collaborator
//!
//! Loads a script file under a module system and returns its export
//! value as JSON. The production engine shells out to `node` with a
//! small harness that prints the export on stdout.

use serde_json::Value;
use std::path::Path;
use std::process::Command;

use crate::config::ModuleSystem;

/// Harness for synchronous-load scripts
const CJS_HARNESS: &str = r#"
const path = require("node:path");
const value = require(path.resolve(process.argv[1]));
const out = JSON.stringify(value);
console.log(out === undefined ? "null" : out);
"#;

/// Harness for asynchronous-import scripts; prints the whole module
/// namespace so the caller can pick the default export
const ESM_HARNESS: &str = r#"
import { pathToFileURL } from "node:url";
import { resolve } from "node:path";
const ns = await import(pathToFileURL(resolve(process.argv[1])).href);
const out = JSON.stringify(ns);
console.log(out === undefined ? "null" : out);
"#;

/// Errors from module evaluation
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Engine process could not be started
    #[error("Failed to start engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Module load failed; the diagnostic carries the engine's stderr
    #[error("{message}")]
    Load {
        message: String,
        diagnostic: Option<String>,
    },

    /// Engine output is not valid JSON
    #[error("Invalid engine output: {0}")]
    Output(#[from] serde_json::Error),
}

impl EngineError {
    /// Diagnostic body carried beyond the message, if any
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            EngineError::Load { diagnostic, .. } => diagnostic.as_deref(),
            _ => None,
        }
    }
}

/// Module loading collaborator
pub trait ModuleEngine {
    /// Evaluate a script file under the given module system and return
    /// its export value
    fn evaluate(&self, path: &Path, system: ModuleSystem) -> Result<Value, EngineError>;
}

/// Engine backed by a `node` executable
#[derive(Debug, Clone)]
pub struct NodeEngine {
    program: String,
}

impl NodeEngine {
    /// Create an engine running the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NodeEngine {
    fn default() -> Self {
        Self::new("node")
    }
}

impl ModuleEngine for NodeEngine {
    fn evaluate(&self, path: &Path, system: ModuleSystem) -> Result<Value, EngineError> {
        let mut command = Command::new(&self.program);
        match system {
            ModuleSystem::CommonJs => command.arg("-e").arg(CJS_HARNESS),
            ModuleSystem::EsModule => command
                .arg("--input-type=module")
                .arg("-e")
                .arg(ESM_HARNESS),
        };
        command.arg(path);

        let output = command.output().map_err(|e| EngineError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(EngineError::Load {
                message: format!("{} exited with {}", self.program, output.status),
                diagnostic: if stderr.is_empty() {
                    None
                } else {
                    Some(stderr.to_string())
                },
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let body = stdout.trim();
        if body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(body)?)
    }
}

/// Extract a module's default export when present, else the whole
/// export value.
pub fn default_export(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("default") {
            Some(default) => default,
            None => Value::Object(map),
        },
        other => other,
    }
}
