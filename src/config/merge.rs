//! Mode override merge logic
//!
//! Reconciles a base configuration with the override set a mode name
//! selects from `modeConfig`:
//! - Plugins: replace in place by identifier, else append (order preserved)
//! - Other fields: shallow override (mode wins)

use serde_json::Value;

const PLUGINS_KEY: &str = "plugins";
const MODE_CONFIG_KEY: &str = "modeConfig";

/// Apply a named mode's override set to a configuration.
///
/// Merge semantics:
/// - Empty mode name, or no `modeConfig` entry for it: identity
/// - Plugins: an override entry whose identifier already exists replaces
///   the existing entry at its position; unmatched entries append in
///   override-list order
/// - Remaining override fields: shallow override by key (non-recursive)
///
/// The `modeConfig` field itself is not separated out of the base, so it
/// survives unchanged into the result.
pub fn apply_mode(mode: &str, config: Value) -> Value {
    if mode.is_empty() {
        return config;
    }

    let mut base = match config {
        Value::Object(map) => map,
        other => return other,
    };

    let mut overrides = match base.get(MODE_CONFIG_KEY).and_then(|modes| modes.get(mode)) {
        Some(Value::Object(map)) => map.clone(),
        _ => return Value::Object(base),
    };

    let override_plugins = match overrides.remove(PLUGINS_KEY) {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    };

    let mut plugins = match base.get(PLUGINS_KEY) {
        Some(Value::Array(entries)) => entries.clone(),
        _ => Vec::new(),
    };

    for entry in override_plugins {
        let existing = plugin_identifier(&entry).and_then(|id| {
            plugins
                .iter()
                .position(|candidate| plugin_identifier(candidate) == Some(id))
        });

        match existing {
            Some(index) => plugins[index] = entry,
            None => plugins.push(entry),
        }
    }

    for (key, value) in overrides {
        base.insert(key, value);
    }
    base.insert(PLUGINS_KEY.to_string(), Value::Array(plugins));

    Value::Object(base)
}

/// Identifier of a plugin entry.
///
/// A bare string is its own identifier; a pair takes its first element.
/// Entries of any other shape have no identifier and never match an
/// existing entry.
fn plugin_identifier(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(name) => Some(name),
        Value::Array(pair) => pair.first().and_then(Value::as_str),
        _ => None,
    }
}
