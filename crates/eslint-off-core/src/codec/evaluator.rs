//! Turning JS config modules into data
//!
//! A config module is arbitrary code. [`StaticEvaluator`] only accepts a
//! literal export and never runs anything. [`NodeEvaluator`] hands the file
//! to a Node.js process, which is the only way to load configs that compute
//! their value.

use super::literal;
use crate::{EslintOffError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Module system a config file is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleSyntax {
    CommonJs,
    EsModule,
}

/// Produces the exported value of a config module
pub trait ModuleEvaluator: Send + Sync {
    /// Evaluate the module at `path`, whose current content is `source`
    fn evaluate(&self, path: &Path, source: &str, syntax: ModuleSyntax) -> Result<Value>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Which evaluator the codec uses for module configs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// Parse literal exports without running code
    #[default]
    Static,
    /// Run the module with Node.js
    Node,
}

/// Reads `module.exports = {...}` / `export default [...]` literals as JSON5
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticEvaluator;

impl ModuleEvaluator for StaticEvaluator {
    fn evaluate(&self, path: &Path, source: &str, syntax: ModuleSyntax) -> Result<Value> {
        let extracted = match syntax {
            ModuleSyntax::CommonJs => literal::commonjs_export(source),
            ModuleSyntax::EsModule => literal::esm_default_export(source),
        };
        let text = extracted.map_err(|e| EslintOffError::evaluation_error(path, e.to_string()))?;

        json5::from_str::<Value>(text)
            .map_err(|e| EslintOffError::evaluation_error(path, format!("invalid literal: {e}")))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Loads the module in a fresh `node` process and reads back its JSON form
///
/// Every call spawns a new process, so no module cache survives between
/// loads.
#[derive(Debug, Clone)]
pub struct NodeEvaluator {
    pub node_binary: PathBuf,
}

/// Imports the module given as the first argument and prints its export
const NODE_LOADER: &str = r#"
import { pathToFileURL } from 'node:url';
const mod = await import(pathToFileURL(process.argv[1]).href);
const config = mod.default || mod;
process.stdout.write(JSON.stringify(config));
"#;

impl NodeEvaluator {
    pub fn new(node_binary: impl Into<PathBuf>) -> Self {
        Self {
            node_binary: node_binary.into(),
        }
    }
}

impl Default for NodeEvaluator {
    fn default() -> Self {
        Self::new("node")
    }
}

impl ModuleEvaluator for NodeEvaluator {
    fn evaluate(&self, path: &Path, _source: &str, _syntax: ModuleSyntax) -> Result<Value> {
        debug!(
            "Evaluating {} with {}",
            path.display(),
            self.node_binary.display()
        );

        let output = Command::new(&self.node_binary)
            .arg("--input-type=module")
            .arg("-e")
            .arg(NODE_LOADER)
            .arg(path)
            .output()
            .map_err(|e| {
                EslintOffError::evaluation_error(
                    path,
                    format!("failed to run '{}': {e}", self.node_binary.display()),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr
                .lines()
                .find(|line| line.contains("Error"))
                .unwrap_or_else(|| stderr.trim());
            return Err(EslintOffError::evaluation_error(path, message.to_string()));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            EslintOffError::evaluation_error(path, format!("module did not export JSON data: {e}"))
        })
    }

    fn name(&self) -> &'static str {
        "node"
    }
}
