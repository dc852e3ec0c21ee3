//! Script execution runtime
//!
//! The collaborators that turn script configs into values: the module
//! engine, the script compiler, and the transient-artifact executor
//! with its module cache.

mod cache;
mod compiler;
mod engine;
mod executor;

pub use cache::ModuleCache;
pub use compiler::{CompileError, EsbuildCompiler, ScriptCompiler};
pub use engine::{default_export, EngineError, ModuleEngine, NodeEngine};
pub use executor::{artifact_path_for, ExecutionFailure, ModuleExecutor, PathSubstitution};
