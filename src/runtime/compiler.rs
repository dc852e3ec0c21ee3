//! Script compiler collaborator
//!
//! Turns statically-typed source into plain executable code for a
//! target module system. The production compiler shells out to
//! `esbuild` and reads the transformed code from stdout.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::ModuleSystem;

/// The external compiler failed for a source file
#[derive(Debug, thiserror::Error)]
#[error("Failed to compile {}: {}", path.display(), message)]
pub struct CompileError {
    /// Source file that failed to compile
    pub path: PathBuf,
    /// Failure message
    pub message: String,
    /// Compiler output, when produced
    pub diagnostic: Option<String>,
}

/// Compiler collaborator
pub trait ScriptCompiler {
    /// Compile a typed source file into plain code for the target
    /// module system
    fn compile(&self, path: &Path, target: ModuleSystem) -> Result<String, CompileError>;
}

/// Compiler backed by an `esbuild` executable
#[derive(Debug, Clone)]
pub struct EsbuildCompiler {
    program: String,
}

impl EsbuildCompiler {
    /// Create a compiler running the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for EsbuildCompiler {
    fn default() -> Self {
        Self::new("esbuild")
    }
}

impl ScriptCompiler for EsbuildCompiler {
    fn compile(&self, path: &Path, target: ModuleSystem) -> Result<String, CompileError> {
        let format = match target {
            ModuleSystem::EsModule => "esm",
            ModuleSystem::CommonJs => "cjs",
        };

        let output = Command::new(&self.program)
            .arg(path)
            .arg(format!("--format={}", format))
            .arg("--platform=node")
            .arg("--log-level=warning")
            .output()
            .map_err(|e| CompileError {
                path: path.to_path_buf(),
                message: format!("failed to start '{}': {}", self.program, e),
                diagnostic: None,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(CompileError {
                path: path.to_path_buf(),
                message: format!("{} exited with {}", self.program, output.status),
                diagnostic: if stderr.is_empty() {
                    None
                } else {
                    Some(stderr.to_string())
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
