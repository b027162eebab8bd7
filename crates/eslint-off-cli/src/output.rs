//! Output formatting and reporting
//!
//! Human output goes through `colored`; JSON output is one object per run,
//! meant for editor integrations.

use colored::*;
use eslint_off_core::{
    ConfigArtifact, ConfigStructure, DisableOutcome, EslintOffError, ErrorKind, Result,
};
use serde_json::{Value, json};

use crate::OutputFormat;

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self { format, use_colors }
    }

    /// Report a successful disable operation
    pub fn print_outcome(&self, outcome: &DisableOutcome) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if let Some(preview) = &outcome.preview {
                    println!(
                        "{} {}",
                        "Would write".bold(),
                        outcome.config_path.display().to_string().bright_blue()
                    );
                    println!("{preview}");
                    eprintln!("Dry run: no files were modified.");
                    return Ok(());
                }

                println!(
                    "{} Successfully disabled rule \"{}\" in ESLint configuration file: {}",
                    self.mark("✓").green(),
                    outcome.rule_name,
                    outcome.config_path.display()
                );
                if outcome.appended_entry {
                    println!("  Added a new entry with files: [\"**/*\"]");
                }
                Ok(())
            }
            OutputFormat::Json => {
                let mut report = serde_json::to_value(outcome).map_err(to_config_error)?;
                if let Value::Object(fields) = &mut report {
                    fields.insert("status".to_string(), json!("ok"));
                }
                print_json(&report)
            }
        }
    }

    /// Report which configuration file applies
    pub fn print_artifact(&self, artifact: &ConfigArtifact) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", artifact.path.display());
                println!("  {} {}", "encoding:".dimmed(), artifact.encoding);
                println!("  {} {}", "flavor:".dimmed(), artifact.flavor);
                Ok(())
            }
            OutputFormat::Json => print_json(&json!({
                "status": "ok",
                "path": artifact.path,
                "encoding": artifact.encoding,
                "flavor": artifact.flavor,
            })),
        }
    }

    /// Print decoded configuration content
    pub fn print_structure(
        &self,
        artifact: &ConfigArtifact,
        structure: &ConfigStructure,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "{} ({} config)",
                    artifact.path.display().to_string().bold(),
                    structure.shape()
                );
                let pretty =
                    serde_json::to_string_pretty(&structure.as_value()).map_err(to_config_error)?;
                println!("{pretty}");
                Ok(())
            }
            OutputFormat::Json => print_json(&json!({
                "status": "ok",
                "path": artifact.path,
                "encoding": artifact.encoding,
                "shape": structure.shape(),
                "config": structure.as_value(),
            })),
        }
    }

    /// Report a failure
    ///
    /// ES module refusals are shown as edit instructions rather than errors.
    pub fn print_error(&self, error: &EslintOffError) {
        match self.format {
            OutputFormat::Human => {
                if let Some(instructions) = error.manual_instructions() {
                    eprintln!("{} {}", self.mark("!").yellow().bold(), error);
                    eprintln!();
                    eprintln!("{instructions}");
                    return;
                }

                let message = match error.kind() {
                    ErrorKind::NotFound => error.to_string(),
                    _ => format!(
                        "An error occurred while updating ESLint configuration file: {error}"
                    ),
                };
                eprintln!("{} {}", "error:".red().bold(), message);
            }
            OutputFormat::Json => {
                let report = json!({
                    "status": "error",
                    "kind": error.kind().as_str(),
                    "message": error.to_string(),
                    "instructions": error.manual_instructions(),
                });
                if let Ok(text) = serde_json::to_string_pretty(&report) {
                    println!("{text}");
                }
            }
        }
    }

    fn mark(&self, symbol: &'static str) -> &'static str {
        if self.use_colors { symbol } else { "-" }
    }
}

fn print_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(to_config_error)?;
    println!("{text}");
    Ok(())
}

fn to_config_error(e: serde_json::Error) -> EslintOffError {
    EslintOffError::config_error(format!("Failed to serialize output: {e}"))
}
