//! buildconf - Build configuration resolution
//!
//! This crate locates a project's build configuration across
//! heterogeneous source formats (JSON-superset data, plain scripts,
//! statically-typed scripts under either module system), loads it
//! through the matching strategy, and reconciles mode-specific
//! overrides into the final configuration object.

pub mod config;
pub mod runtime;

pub use config::{
    apply_mode, ConfigError, ConfigFormat, ConfigLoader, ConfigResolver, ConfigSource,
    ModuleSystem, PackageManifest, ResolveOptions, ResolvedConfig,
};
pub use runtime::{
    CompileError, EngineError, ExecutionFailure, ModuleCache, ModuleEngine, ModuleExecutor,
    ScriptCompiler,
};
