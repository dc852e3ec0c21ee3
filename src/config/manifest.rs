//! Package manifest lookup
//!
//! Reads the project's `package.json` for the module-type declaration
//! that resolves ambiguous script suffixes.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Manifest file name probed in the project root
pub const MANIFEST_FILE: &str = "package.json";

/// The subset of `package.json` that affects config loading
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    /// Declared module type; `"module"` selects asynchronous import for
    /// ambiguous suffixes
    #[serde(rename = "type")]
    pub module_type: Option<String>,
}

impl PackageManifest {
    /// Read the manifest from a project root.
    ///
    /// A missing, unreadable, or unparseable manifest degrades to the
    /// default declaration; it never fails a resolution.
    pub fn discover(root: &Path) -> Self {
        let path = root.join(MANIFEST_FILE);
        if !path.exists() {
            return Self::default();
        }

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read manifest {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!("Failed to parse manifest {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Whether ambiguous script suffixes default to asynchronous import
    pub fn is_module_default(&self) -> bool {
        self.module_type.as_deref() == Some("module")
    }
}
