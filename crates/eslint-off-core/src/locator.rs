//! Configuration file discovery
//!
//! Walks upward from a source file to the filesystem root and returns the
//! nearest ESLint configuration. Nothing is written.

use crate::artifact::{ConfigArtifact, MANIFEST_CONFIG_KEY, MANIFEST_FILE_NAME};
use crate::transform::is_falsy;
use crate::{EslintOffError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

/// Candidate filenames in priority order within one directory
///
/// Flat config names come first, then legacy names, then the manifest.
pub const CONFIG_FILE_NAMES: [&str; 8] = [
    "eslint.config.js",
    "eslint.config.mjs",
    "eslint.config.cjs",
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.json",
    ".eslintrc",
    MANIFEST_FILE_NAME,
];

/// Finds the configuration that applies to a file
pub struct ConfigLocator;

impl ConfigLocator {
    /// Locate the config for `start_file`, starting in its directory
    pub fn locate(start_file: &Path) -> Result<Option<ConfigArtifact>> {
        let start_file = absolute(start_file)?;
        let dir = start_file.parent().unwrap_or(start_file.as_path());
        Self::locate_from_dir(dir)
    }

    /// Locate the nearest config starting in `dir` itself
    ///
    /// Each directory is probed for every name in [`CONFIG_FILE_NAMES`]
    /// before moving to its parent. A `package.json` only counts when it
    /// carries a non-empty `eslintConfig`.
    pub fn locate_from_dir(dir: &Path) -> Result<Option<ConfigArtifact>> {
        let mut current = absolute(dir)?;

        loop {
            trace!("Searching {}", current.display());

            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if !config_path.is_file() {
                    continue;
                }
                if filename == MANIFEST_FILE_NAME && !manifest_has_config(&config_path)? {
                    debug!("Skipping {} (no eslintConfig)", config_path.display());
                    continue;
                }

                debug!("Found config: {}", config_path.display());
                return ConfigArtifact::classify(config_path).map(Some);
            }

            // The root is the directory that is its own parent
            match current.parent() {
                Some(parent) if parent != current => current = parent.to_path_buf(),
                _ => break,
            }
        }

        Ok(None)
    }
}

/// Absolute form of `path` with `.` and `..` resolved lexically
///
/// Symlinks are kept as written, so `..` always means the textual parent.
fn absolute(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| EslintOffError::io_error(path, e))?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn manifest_has_config(path: &Path) -> Result<bool> {
    let content = fs::read_to_string(path).map_err(|e| EslintOffError::io_error(path, e))?;
    let manifest: Value = serde_json::from_str(&content)
        .map_err(|e| EslintOffError::parse_error(path, e.to_string()))?;

    Ok(manifest
        .get(MANIFEST_CONFIG_KEY)
        .is_some_and(|config| !is_falsy(config)))
}
