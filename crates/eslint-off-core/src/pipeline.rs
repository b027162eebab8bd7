//! The disable-rule operation: locate, load, transform, save
//!
//! Steps run strictly in sequence. All edits stay in memory until the final
//! save, so a failure or cancellation before that point leaves the file as
//! it was.

use crate::artifact::{ConfigArtifact, ConfigShape};
use crate::codec::{CodecOptions, ConfigCodec};
use crate::locator::ConfigLocator;
use crate::transform::FlatEdit;
use crate::{EslintOffError, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An ESLint rule identifier, used verbatim as a mapping key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RuleName(String);

impl RuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Flatten a diagnostic `code` into a rule name
    ///
    /// Editors report the code either as a plain string/number or as an
    /// object whose `value` holds it (with a documentation `target` next
    /// to it).
    pub fn from_diagnostic_code(code: &Value) -> Option<Self> {
        match code {
            Value::String(s) => Some(Self::new(s.clone())),
            Value::Number(n) => Some(Self::new(n.to_string())),
            Value::Object(fields) => fields
                .get("value")
                .filter(|v| !v.is_object())
                .and_then(Self::from_diagnostic_code),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Input of one disable operation
#[derive(Debug, Clone)]
pub struct DisableRequest {
    /// File (or directory) the search starts from
    pub start: PathBuf,
    pub rule_name: RuleName,
    /// Render the new content without writing it
    pub dry_run: bool,
}

impl DisableRequest {
    pub fn new(start: impl Into<PathBuf>, rule_name: impl Into<RuleName>) -> Self {
        Self {
            start: start.into(),
            rule_name: rule_name.into(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of a successful disable operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisableOutcome {
    pub rule_name: RuleName,
    pub config_path: PathBuf,
    pub shape: ConfigShape,
    /// Set when a new `files: ["**/*"]` entry had to be appended
    pub appended_entry: bool,
    /// Whether the file was written
    pub written: bool,
    /// Rendered file content for dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Locate the applicable config and disable the rule in it
///
/// Directories are searched from themselves, files from their parent.
pub fn disable_rule(request: &DisableRequest, options: &CodecOptions) -> Result<DisableOutcome> {
    let artifact = locate_config(&request.start)?;
    let codec = ConfigCodec::new(options.clone());
    disable_rule_in(&codec, &artifact, request)
}

/// Locate the config for `start`, failing with `NotFound`
pub fn locate_config(start: &Path) -> Result<ConfigArtifact> {
    let found = if start.is_dir() {
        ConfigLocator::locate_from_dir(start)?
    } else {
        ConfigLocator::locate(start)?
    };

    found.ok_or_else(|| EslintOffError::NotFound {
        start: start.to_path_buf(),
    })
}

/// Disable the rule in an already located artifact
pub fn disable_rule_in(
    codec: &ConfigCodec,
    artifact: &ConfigArtifact,
    request: &DisableRequest,
) -> Result<DisableOutcome> {
    let rule = request.rule_name.as_str();

    // ES modules are refused up front; their content is never needed
    codec
        .ensure_encoding_writable(artifact)
        .map_err(|e| e.with_rule_name(rule))?;

    let mut loaded = codec.load(artifact)?;
    codec
        .ensure_writable(artifact, &loaded)
        .map_err(|e| e.with_rule_name(rule))?;

    let edit = loaded.structure.disable_rule(rule);
    debug!("Applied edit {:?} for '{}'", edit, rule);

    let preview = if request.dry_run {
        Some(codec.render(artifact, &loaded.structure)?)
    } else {
        codec
            .save(artifact, &loaded)
            .map_err(|e| e.with_rule_name(rule))?;
        info!(
            "Disabled rule \"{}\" in {}",
            rule,
            artifact.path().display()
        );
        None
    };

    Ok(DisableOutcome {
        rule_name: request.rule_name.clone(),
        config_path: artifact.path.clone(),
        shape: loaded.structure.shape(),
        appended_entry: matches!(edit, Some(FlatEdit::Appended(_))),
        written: !request.dry_run,
        preview,
    })
}
