//! Classification of located configuration files
//!
//! Every file the codec touches is classified exactly once into a
//! [`ConfigArtifact`]. Load and save then match on [`ConfigEncoding`]
//! instead of re-inspecting the filename.

use crate::{EslintOffError, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix shared by all flat config filenames
pub const FLAT_CONFIG_PREFIX: &str = "eslint.config.";

/// Package manifest that may embed a legacy config
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Key holding the embedded config inside a package manifest
pub const MANIFEST_CONFIG_KEY: &str = "eslintConfig";

/// On-disk encoding of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigEncoding {
    /// Plain JSON document
    Json,
    /// JSON nested under `eslintConfig` in a package manifest
    Manifest,
    /// CommonJS module assigning `module.exports`
    CommonJs,
    /// ECMAScript module with a default export
    EsModule,
}

/// Format family suggested by the filename
///
/// This is only a hint. The decoded content decides the shape used by the
/// transform step (see [`ConfigShape`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigFlavor {
    Flat,
    Legacy,
}

/// Shape of decoded configuration content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigShape {
    /// Ordered array of override entries
    Flat,
    /// Single settings object
    Legacy,
}

/// A located configuration file and how to read and write it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigArtifact {
    pub path: PathBuf,
    pub encoding: ConfigEncoding,
    pub flavor: ConfigFlavor,
}

impl ConfigArtifact {
    /// Classify a configuration path by its filename
    ///
    /// Flat config names (`eslint.config.*`) are checked first for the
    /// module extensions. Everything else, including flat-prefixed names
    /// with other extensions, goes through the legacy dispatch.
    pub fn classify(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| EslintOffError::unsupported_format(&path))?
            .to_string();
        let ext = path.extension().and_then(|e| e.to_str());

        let flavor = if file_name.starts_with(FLAT_CONFIG_PREFIX) {
            ConfigFlavor::Flat
        } else {
            ConfigFlavor::Legacy
        };

        let encoding = match (flavor, ext) {
            (ConfigFlavor::Flat, Some("mjs")) => ConfigEncoding::EsModule,
            (_, Some("js")) | (_, Some("cjs")) => ConfigEncoding::CommonJs,
            _ if file_name == MANIFEST_FILE_NAME => ConfigEncoding::Manifest,
            (_, Some("json")) | (_, None) => ConfigEncoding::Json,
            _ => return Err(EslintOffError::unsupported_format(&path)),
        };

        Ok(Self {
            path,
            encoding,
            flavor,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for ConfigEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigEncoding::Json => "json",
            ConfigEncoding::Manifest => "package.json (eslintConfig)",
            ConfigEncoding::CommonJs => "commonjs module",
            ConfigEncoding::EsModule => "es module",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ConfigFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigFlavor::Flat => "flat",
            ConfigFlavor::Legacy => "legacy",
        })
    }
}

impl fmt::Display for ConfigShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigShape::Flat => "flat",
            ConfigShape::Legacy => "legacy",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str) -> ConfigArtifact {
        ConfigArtifact::classify(PathBuf::from("/w").join(name)).unwrap()
    }

    #[test]
    fn test_flat_config_names() {
        let mjs = classify("eslint.config.mjs");
        assert_eq!(mjs.encoding, ConfigEncoding::EsModule);
        assert_eq!(mjs.flavor, ConfigFlavor::Flat);

        assert_eq!(classify("eslint.config.js").encoding, ConfigEncoding::CommonJs);
        assert_eq!(classify("eslint.config.cjs").encoding, ConfigEncoding::CommonJs);
        assert_eq!(classify("eslint.config.cjs").flavor, ConfigFlavor::Flat);
    }

    #[test]
    fn test_legacy_config_names() {
        assert_eq!(classify(".eslintrc.js").encoding, ConfigEncoding::CommonJs);
        assert_eq!(classify(".eslintrc.cjs").encoding, ConfigEncoding::CommonJs);
        assert_eq!(classify(".eslintrc.json").encoding, ConfigEncoding::Json);
        assert_eq!(classify(".eslintrc").encoding, ConfigEncoding::Json);
        assert_eq!(classify("package.json").encoding, ConfigEncoding::Manifest);
        assert_eq!(classify(".eslintrc.json").flavor, ConfigFlavor::Legacy);
    }

    #[test]
    fn test_flat_prefix_with_json_extension_falls_through() {
        let artifact = classify("eslint.config.json");
        assert_eq!(artifact.encoding, ConfigEncoding::Json);
        assert_eq!(artifact.flavor, ConfigFlavor::Flat);
    }

    #[test]
    fn test_legacy_mjs_is_unsupported() {
        let err = ConfigArtifact::classify("/w/.eslintrc.mjs").unwrap_err();
        assert!(matches!(err, EslintOffError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_yaml_is_unsupported() {
        let err = ConfigArtifact::classify("/w/.eslintrc.yaml").unwrap_err();
        assert!(matches!(err, EslintOffError::UnsupportedFormat { .. }));
    }
}
