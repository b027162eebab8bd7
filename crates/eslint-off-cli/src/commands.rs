//! CLI command implementations

use eslint_off_core::{
    CodecOptions, ConfigCodec, DisableRequest, EslintOffError, Result, RuleName, disable_rule,
    locate_config,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::output::OutputFormatter;

/// Disable command implementation
pub fn disable_command(
    rule: Option<String>,
    code: Option<String>,
    path: PathBuf,
    dry_run: bool,
    options: &CodecOptions,
    formatter: &OutputFormatter,
) -> Result<()> {
    let rule_name = match (rule, code) {
        (Some(rule), _) => RuleName::new(rule),
        (None, Some(code)) => rule_from_code(&code)?,
        (None, None) => return Err(EslintOffError::config_error("no rule name given")),
    };
    debug!("Disabling '{}' starting from {}", rule_name, path.display());

    let request = DisableRequest {
        start: path,
        rule_name,
        dry_run,
    };
    let outcome = disable_rule(&request, options)?;
    formatter.print_outcome(&outcome)
}

/// Locate command implementation
pub fn locate_command(path: PathBuf, formatter: &OutputFormatter) -> Result<()> {
    debug!("Locating config for {}", path.display());
    let artifact = locate_config(&path)?;
    formatter.print_artifact(&artifact)
}

/// Show command implementation
pub fn show_command(
    path: PathBuf,
    options: &CodecOptions,
    formatter: &OutputFormatter,
) -> Result<()> {
    let artifact = locate_config(&path)?;
    let loaded = ConfigCodec::new(options.clone()).load(&artifact)?;
    formatter.print_structure(&artifact, &loaded.structure)
}

/// Accepts either raw JSON (`"semi"`, `{"value": "semi"}`) or a bare name
fn rule_from_code(code: &str) -> Result<RuleName> {
    let value = serde_json::from_str::<Value>(code).unwrap_or_else(|_| Value::from(code));
    RuleName::from_diagnostic_code(&value).ok_or_else(|| {
        EslintOffError::config_error(format!("diagnostic code '{code}' carries no rule name"))
    })
}
