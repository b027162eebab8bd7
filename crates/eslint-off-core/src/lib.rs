//! eslint-off core
//!
//! Finds the ESLint configuration that applies to a source file and turns
//! one rule off in it. Both config generations are handled:
//! - flat configs (`eslint.config.{js,mjs,cjs}`), an array of override entries
//! - legacy configs (`.eslintrc*`, `package.json#eslintConfig`), a single object
//!
//! The work is a short pipeline: [`ConfigLocator`] walks up from the file,
//! [`ConfigCodec`] loads the located file into a [`ConfigStructure`], the
//! transform disables the rule, and the codec writes the file back in its
//! original encoding.
//!
//! ```no_run
//! use eslint_off_core::{CodecOptions, DisableRequest, disable_rule};
//!
//! let request = DisableRequest::new("/work/app/src/index.js", "no-console");
//! let outcome = disable_rule(&request, &CodecOptions::default())?;
//! println!("{} disabled in {}", outcome.rule_name, outcome.config_path.display());
//! # Ok::<(), eslint_off_core::EslintOffError>(())
//! ```

pub mod artifact;
pub mod codec;
pub mod error;
pub mod locator;
pub mod pipeline;
pub mod result;
pub mod transform;

pub use artifact::{ConfigArtifact, ConfigEncoding, ConfigFlavor, ConfigShape};
pub use codec::{
    CodecOptions, ConfigCodec, EvaluatorKind, LoadedConfig, ModuleEvaluator, ModuleSyntax,
    NodeEvaluator, StaticEvaluator,
};
pub use error::{ErrorKind, EslintOffError};
pub use locator::{CONFIG_FILE_NAMES, ConfigLocator};
pub use pipeline::{
    DisableOutcome, DisableRequest, RuleName, disable_rule, disable_rule_in, locate_config,
};
pub use result::Result;
pub use transform::{
    ConfigStructure, FlatEdit, is_flat_config, update_rule_in_flat_config,
    update_rule_in_legacy_config,
};

/// Initialize the tracing subscriber for logging
///
/// Log output goes to stderr so command output on stdout stays parseable.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eslint_off=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
