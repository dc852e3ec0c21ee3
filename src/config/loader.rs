//! Config loading dispatch
//!
//! Classifies a resolved path and drives the matching strategy:
//! structured data parses directly, plain scripts run through the
//! module engine, typed sources compile first and execute as a
//! transient artifact.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::runtime::{
    default_export, ExecutionFailure, ModuleEngine, ModuleExecutor, ScriptCompiler,
};

use super::error::ConfigError;
use super::format::{classify, ConfigFormat, ModuleSystem};
use super::manifest::PackageManifest;

/// Loads a config file according to its classified format
#[derive(Debug)]
pub struct ConfigLoader<C, E> {
    compiler: C,
    engine: E,
    executor: ModuleExecutor,
}

impl<C: ScriptCompiler, E: ModuleEngine> ConfigLoader<C, E> {
    /// Create a loader over the given collaborators
    pub fn new(compiler: C, engine: E) -> Self {
        Self {
            compiler,
            engine,
            executor: ModuleExecutor::new(),
        }
    }

    /// Executor holding the module cache
    pub fn executor(&self) -> &ModuleExecutor {
        &self.executor
    }

    /// Load the raw configuration object from a path.
    ///
    /// The payload comes back unvalidated. Failures propagate from
    /// read, parse, compile, and execution errors.
    pub fn load(&mut self, path: &Path, manifest: &PackageManifest) -> Result<Value, ConfigError> {
        let format = classify(path, manifest)
            .ok_or_else(|| ConfigError::UnsupportedExtension(path.to_path_buf()))?;

        tracing::debug!("Loading {} as {}", path.display(), format);

        match format {
            ConfigFormat::StructuredData => {
                let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                let value = json5::from_str(&contents).map_err(|e| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                Ok(value)
            }
            ConfigFormat::PlainScript(system) => {
                let value = self
                    .engine
                    .evaluate(path, system)
                    .map_err(|e| ExecutionFailure::from_engine(path, &e))?;

                // The asynchronous-import system yields the default
                // export; the synchronous system the whole export value
                Ok(match system {
                    ModuleSystem::EsModule => default_export(value),
                    ModuleSystem::CommonJs => value,
                })
            }
            ConfigFormat::TypedScript(system) => {
                let code = self.compiler.compile(path, system)?;
                let value = self.executor.execute(&self.engine, &code, path, system)?;
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{CompileError, EngineError};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    struct StaticEngine(Value);

    impl ModuleEngine for StaticEngine {
        fn evaluate(&self, _path: &Path, _system: ModuleSystem) -> Result<Value, EngineError> {
            Ok(self.0.clone())
        }
    }

    struct StaticCompiler(&'static str);

    impl ScriptCompiler for StaticCompiler {
        fn compile(&self, _path: &Path, _target: ModuleSystem) -> Result<String, CompileError> {
            Ok(self.0.to_string())
        }
    }

    struct UnusedCompiler;

    impl ScriptCompiler for UnusedCompiler {
        fn compile(&self, path: &Path, _target: ModuleSystem) -> Result<String, CompileError> {
            panic!("compiler invoked for {}", path.display());
        }
    }

    #[test]
    fn test_structured_data_with_relaxed_grammar() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build.config.json5");
        fs::write(&path, "{a: 1, /*c*/ b: 2,}").unwrap();

        let mut loader = ConfigLoader::new(UnusedCompiler, StaticEngine(Value::Null));
        let value = loader.load(&path, &PackageManifest::default()).unwrap();

        assert_eq!(value, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_structured_data_parse_failure() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build.config.json");
        fs::write(&path, "{a: [}").unwrap();

        let mut loader = ConfigLoader::new(UnusedCompiler, StaticEngine(Value::Null));
        let result = loader.load(&path, &PackageManifest::default());

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_structured_data_read_failure() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build.config.json");

        let mut loader = ConfigLoader::new(UnusedCompiler, StaticEngine(Value::Null));
        let result = loader.load(&path, &PackageManifest::default());

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_plain_esm_takes_default_export() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build.config.mjs");
        fs::write(&path, "export default {}").unwrap();

        let engine = StaticEngine(json!({"default": {"a": 1}}));
        let mut loader = ConfigLoader::new(UnusedCompiler, engine);
        let value = loader.load(&path, &PackageManifest::default()).unwrap();

        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_plain_cjs_takes_whole_export() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build.config.cjs");
        fs::write(&path, "module.exports = {}").unwrap();

        // A CJS export that happens to have a `default` key stays whole
        let engine = StaticEngine(json!({"default": {"a": 1}, "b": 2}));
        let mut loader = ConfigLoader::new(UnusedCompiler, engine);
        let value = loader.load(&path, &PackageManifest::default()).unwrap();

        assert_eq!(value, json!({"default": {"a": 1}, "b": 2}));
    }

    #[test]
    fn test_typed_source_compiles_then_executes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build.config.ts");
        fs::write(&path, "export default { plugins: ['A'] }").unwrap();

        let engine = StaticEngine(json!({"default": {"plugins": ["A"]}}));
        let mut loader = ConfigLoader::new(StaticCompiler("compiled code"), engine);
        let value = loader.load(&path, &PackageManifest::default()).unwrap();

        assert_eq!(value, json!({"plugins": ["A"]}));
    }

    #[test]
    fn test_compile_failure_propagates() {
        struct BrokenCompiler;

        impl ScriptCompiler for BrokenCompiler {
            fn compile(&self, path: &Path, _target: ModuleSystem) -> Result<String, CompileError> {
                Err(CompileError {
                    path: path.to_path_buf(),
                    message: "syntax error".to_string(),
                    diagnostic: None,
                })
            }
        }

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build.config.ts");
        fs::write(&path, "export default {").unwrap();

        let mut loader = ConfigLoader::new(BrokenCompiler, StaticEngine(Value::Null));
        let result = loader.load(&path, &PackageManifest::default());

        assert!(matches!(result, Err(ConfigError::Compile(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let mut loader = ConfigLoader::new(UnusedCompiler, StaticEngine(Value::Null));
        let result = loader.load(Path::new("build.config.yaml"), &PackageManifest::default());

        assert!(matches!(result, Err(ConfigError::UnsupportedExtension(_))));
    }
}
