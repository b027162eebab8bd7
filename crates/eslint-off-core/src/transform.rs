//! Rule-disabling edits on decoded configuration content
//!
//! Everything here is pure: no I/O and no failure modes. Rule names are
//! used verbatim as mapping keys.

use crate::artifact::ConfigShape;
use crate::{EslintOffError, Result};
use serde_json::{Map, Value, json};
use std::path::Path;

/// Pattern that makes a flat config entry apply to every file
pub const MATCH_ALL_PATTERN: &str = "**/*";

/// Severity written into flat configs
pub const FLAT_OFF_SEVERITY: &str = "off";

/// Severity written into legacy configs
pub const LEGACY_OFF_SEVERITY: u64 = 0;

/// Decoded configuration content
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigStructure {
    /// Ordered override entries
    Flat(Vec<Value>),
    /// Single settings object
    Legacy(Map<String, Value>),
}

/// Where a flat-config edit landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatEdit {
    /// An existing global entry at this index was updated
    Updated(usize),
    /// A new global entry was appended at this index
    Appended(usize),
}

impl ConfigStructure {
    /// Normalize a decoded value by its top-level shape
    pub fn from_value(value: Value, path: &Path) -> Result<Self> {
        match value {
            Value::Array(entries) => Ok(ConfigStructure::Flat(entries)),
            Value::Object(settings) => Ok(ConfigStructure::Legacy(settings)),
            other => Err(EslintOffError::parse_error(
                path,
                format!(
                    "expected an array or an object at the top level, found {}",
                    type_name(&other)
                ),
            )),
        }
    }

    pub fn shape(&self) -> ConfigShape {
        match self {
            ConfigStructure::Flat(_) => ConfigShape::Flat,
            ConfigStructure::Legacy(_) => ConfigShape::Legacy,
        }
    }

    pub fn as_value(&self) -> Value {
        match self {
            ConfigStructure::Flat(entries) => Value::Array(entries.clone()),
            ConfigStructure::Legacy(settings) => Value::Object(settings.clone()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            ConfigStructure::Flat(entries) => Value::Array(entries),
            ConfigStructure::Legacy(settings) => Value::Object(settings),
        }
    }

    /// Disable `rule_name` using the edit that matches this shape
    ///
    /// Returns the flat-config edit location, or `None` for legacy configs.
    pub fn disable_rule(&mut self, rule_name: &str) -> Option<FlatEdit> {
        match self {
            ConfigStructure::Flat(entries) => Some(update_rule_in_flat_config(entries, rule_name)),
            ConfigStructure::Legacy(settings) => {
                update_rule_in_legacy_config(settings, rule_name);
                None
            }
        }
    }
}

/// Flat configs decode to arrays, legacy configs to objects
pub fn is_flat_config(value: &Value) -> bool {
    value.is_array()
}

/// Turn `rule_name` off in the first global entry, appending one if needed
pub fn update_rule_in_flat_config(entries: &mut Vec<Value>, rule_name: &str) -> FlatEdit {
    match entries.iter().position(is_global_entry) {
        Some(index) => {
            if let Value::Object(entry) = &mut entries[index] {
                set_rule(entry, rule_name, Value::from(FLAT_OFF_SEVERITY));
            }
            FlatEdit::Updated(index)
        }
        None => {
            entries.push(json!({
                "files": [MATCH_ALL_PATTERN],
                "rules": { rule_name: FLAT_OFF_SEVERITY }
            }));
            FlatEdit::Appended(entries.len() - 1)
        }
    }
}

/// Set `rules[rule_name] = 0` on a legacy settings object
pub fn update_rule_in_legacy_config(settings: &mut Map<String, Value>, rule_name: &str) {
    set_rule(settings, rule_name, Value::from(LEGACY_OFF_SEVERITY));
}

/// An entry without file scoping, or scoped to every file
///
/// A `files` value that is present but falsy (`null`, `false`, `0`, `""`)
/// counts as absent. Non-object entries are never global.
pub fn is_global_entry(entry: &Value) -> bool {
    let Value::Object(entry) = entry else {
        return false;
    };

    match entry.get("files") {
        None => true,
        Some(files) if is_falsy(files) => true,
        Some(Value::Array(patterns)) => patterns
            .iter()
            .any(|p| p.as_str() == Some(MATCH_ALL_PATTERN)),
        Some(_) => false,
    }
}

fn set_rule(target: &mut Map<String, Value>, rule_name: &str, severity: Value) {
    let rules = target
        .entry("rules")
        .or_insert_with(|| Value::Object(Map::new()));

    if !rules.is_object() {
        if !is_falsy(rules) {
            tracing::warn!("Replacing non-object `rules` value: {}", rules);
        }
        *rules = Value::Object(Map::new());
    }

    if let Value::Object(rules) = rules {
        rules.insert(rule_name.to_string(), severity);
    }
}

pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
