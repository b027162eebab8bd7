//! Error types for locating, decoding and rewriting ESLint configurations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for eslint-off operations
#[derive(Debug, Error)]
pub enum EslintOffError {
    /// No configuration file reachable from the upward walk
    #[error("ESLint configuration file not found (searched upward from '{start}')")]
    NotFound { start: PathBuf },

    /// Content exists but cannot be decoded as the expected format
    #[error("Failed to parse '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    /// Filename/extension combination not handled by the codec
    #[error("Unsupported ESLint configuration format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// ES module flat configs are never rewritten automatically
    #[error(
        "Cannot rewrite ES module config '{path}' automatically; add the rule to it by hand"
    )]
    EsmWriteUnsupported {
        path: PathBuf,
        rule_name: Option<String>,
    },

    /// The file changed on disk between load and save
    #[error("'{path}' was modified by another writer since it was loaded; nothing was written")]
    ConcurrentModification { path: PathBuf },

    /// A JS config module could not be turned into data
    #[error("Failed to evaluate module '{path}': {message}")]
    EvaluationError { path: PathBuf, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid tool settings
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Parse,
    UnsupportedFormat,
    EsmWriteUnsupported,
    ConcurrentModification,
    Evaluation,
    Io,
    Config,
}

impl ErrorKind {
    /// Stable identifier for machine-readable output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not-found",
            ErrorKind::Parse => "parse-error",
            ErrorKind::UnsupportedFormat => "unsupported-format",
            ErrorKind::EsmWriteUnsupported => "esm-write-unsupported",
            ErrorKind::ConcurrentModification => "concurrent-modification",
            ErrorKind::Evaluation => "evaluation-error",
            ErrorKind::Io => "io-error",
            ErrorKind::Config => "config-error",
        }
    }
}

impl EslintOffError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EslintOffError::NotFound { .. } => ErrorKind::NotFound,
            EslintOffError::ParseError { .. } => ErrorKind::Parse,
            EslintOffError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            EslintOffError::EsmWriteUnsupported { .. } => ErrorKind::EsmWriteUnsupported,
            EslintOffError::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            EslintOffError::EvaluationError { .. } => ErrorKind::Evaluation,
            EslintOffError::IoError { .. } => ErrorKind::Io,
            EslintOffError::ConfigError { .. } => ErrorKind::Config,
        }
    }

    /// Whether the caller should show instructions instead of a plain error
    pub fn is_actionable(&self) -> bool {
        matches!(self, EslintOffError::EsmWriteUnsupported { .. })
    }

    /// Manual edit instructions for errors that have them
    pub fn manual_instructions(&self) -> Option<String> {
        match self {
            EslintOffError::EsmWriteUnsupported { path, rule_name } => {
                let rule = match rule_name {
                    Some(name) => serde_json::to_string(name).unwrap_or_else(|_| name.clone()),
                    None => "\"<rule-name>\"".to_string(),
                };
                Some(format!(
                    "To disable this rule, add the following entry to the exported array in {}:\n\
                     \n  {{\n    files: [\"**/*\"],\n    rules: {{\n      {rule}: \"off\"\n    }}\n  }}\n\
                     \nIf the file already has an entry without `files` (or with \"**/*\"), \
                     add {rule}: \"off\" to its `rules` instead.",
                    path.display()
                ))
            }
            _ => None,
        }
    }

    /// Attach the rule being disabled to an ES module refusal
    pub fn with_rule_name(self, rule: &str) -> Self {
        match self {
            EslintOffError::EsmWriteUnsupported { path, .. } => EslintOffError::EsmWriteUnsupported {
                path,
                rule_name: Some(rule.to_string()),
            },
            other => other,
        }
    }

    /// Create a parse error
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an evaluation error
    pub fn evaluation_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::EvaluationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for EslintOffError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = EslintOffError::unsupported_format("/w/.eslintrc.yaml");
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert_eq!(err.kind().as_str(), "unsupported-format");
        assert!(!err.is_actionable());
        assert!(err.manual_instructions().is_none());
    }

    #[test]
    fn test_esm_refusal_is_actionable() {
        let err = EslintOffError::EsmWriteUnsupported {
            path: PathBuf::from("/w/eslint.config.mjs"),
            rule_name: None,
        }
        .with_rule_name("no-console");
        assert!(err.is_actionable());

        let instructions = err.manual_instructions().unwrap();
        assert!(instructions.contains("/w/eslint.config.mjs"));
        assert!(instructions.contains(r#""no-console": "off""#));
        assert!(instructions.contains(r#"files: ["**/*"]"#));
    }

    #[test]
    fn test_instructions_without_rule_name() {
        let err = EslintOffError::EsmWriteUnsupported {
            path: PathBuf::from("/w/eslint.config.mjs"),
            rule_name: None,
        };
        assert!(err.manual_instructions().unwrap().contains(r#""<rule-name>": "off""#));
        assert!(
            EslintOffError::config_error("x")
                .with_rule_name("y")
                .manual_instructions()
                .is_none()
        );
    }

    #[test]
    fn test_display_includes_path() {
        let err = EslintOffError::parse_error("/w/.eslintrc", "expected value at line 1");
        assert_eq!(
            err.to_string(),
            "Failed to parse '/w/.eslintrc': expected value at line 1"
        );
    }
}
