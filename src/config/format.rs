//! Config format classification
//!
//! Format and module system are decided once, purely from the filename
//! suffix plus the package manifest's module-type declaration. Content
//! is never inspected.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::manifest::PackageManifest;

/// Module-loading discipline a script file is written against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleSystem {
    /// Asynchronous-import based (ES module)
    EsModule,
    /// Synchronous-load based (CommonJS)
    CommonJs,
}

impl ModuleSystem {
    /// Suffix for a compiled artifact targeting this system
    pub fn artifact_extension(&self) -> &'static str {
        match self {
            ModuleSystem::EsModule => "mjs",
            ModuleSystem::CommonJs => "cjs",
        }
    }
}

impl fmt::Display for ModuleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleSystem::EsModule => write!(f, "esm"),
            ModuleSystem::CommonJs => write!(f, "cjs"),
        }
    }
}

/// Classified source format of a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigFormat {
    /// JSON-superset data, parsed directly
    StructuredData,
    /// Plain executable script under the given module system
    PlainScript(ModuleSystem),
    /// Statically-typed source compiled before execution
    TypedScript(ModuleSystem),
}

impl ConfigFormat {
    /// Module system for script formats (None for structured data)
    pub fn module_system(&self) -> Option<ModuleSystem> {
        match self {
            ConfigFormat::StructuredData => None,
            ConfigFormat::PlainScript(system) | ConfigFormat::TypedScript(system) => Some(*system),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::StructuredData => write!(f, "data"),
            ConfigFormat::PlainScript(system) => write!(f, "script ({})", system),
            ConfigFormat::TypedScript(system) => write!(f, "typed script ({})", system),
        }
    }
}

/// Classify a config path by suffix.
///
/// The `mjs`/`cjs` and `mts`/`cts` suffixes name their module system
/// explicitly; the ambiguous `js`/`ts` suffixes fall back to the
/// manifest's declared module type (synchronous load when undeclared).
/// Returns `None` for suffixes the loader does not understand.
pub fn classify(path: &Path, manifest: &PackageManifest) -> Option<ConfigFormat> {
    let ext = path.extension()?.to_str()?;

    let ambient = if manifest.is_module_default() {
        ModuleSystem::EsModule
    } else {
        ModuleSystem::CommonJs
    };

    let format = match ext {
        "json" | "json5" | "jsonc" => ConfigFormat::StructuredData,
        "mjs" => ConfigFormat::PlainScript(ModuleSystem::EsModule),
        "cjs" => ConfigFormat::PlainScript(ModuleSystem::CommonJs),
        "js" => ConfigFormat::PlainScript(ambient),
        "mts" => ConfigFormat::TypedScript(ModuleSystem::EsModule),
        "cts" => ConfigFormat::TypedScript(ModuleSystem::CommonJs),
        "ts" => ConfigFormat::TypedScript(ambient),
        _ => return None,
    };

    Some(format)
}
