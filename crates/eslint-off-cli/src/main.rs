//! eslint-off CLI
//!
//! Command-line host for disabling an ESLint rule in the nearest config

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use eslint_off_core::{CodecOptions, EvaluatorKind, init_tracing};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::output::OutputFormatter;

#[derive(Parser)]
#[command(name = "eslint-off")]
#[command(about = "Disable an ESLint rule in the configuration that applies to a file")]
#[command(version = eslint_off_core::VERSION)]
#[command(
    long_about = "eslint-off finds the ESLint configuration nearest to a file (flat eslint.config.*, \
legacy .eslintrc*, or package.json#eslintConfig) and turns one rule off in it.\n\
\n\
Examples:\n  \
eslint-off disable no-console --path src/app.js   # Disable a rule for the project\n  \
eslint-off disable --code '{\"value\":\"eqeqeq\"}'  # Take the rule from a diagnostic code\n  \
eslint-off disable semi --dry-run                  # Print the new config instead of writing it\n  \
eslint-off locate src/app.js                       # Show which config applies\n  \
eslint-off show                                    # Print the decoded configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        default_value = "human",
        help = "Output format"
    )]
    format: OutputFormat,

    /// How JS config modules are read
    #[arg(
        long,
        global = true,
        env = "ESLINT_OFF_EVALUATOR",
        default_value = "static",
        help = "Module evaluator: 'static' reads literal exports, 'node' runs the module"
    )]
    evaluator: EvaluatorArg,

    /// Node.js binary for the node evaluator
    #[arg(
        long,
        global = true,
        env = "ESLINT_OFF_NODE",
        default_value = "node",
        help = "Node.js binary used by --evaluator node"
    )]
    node: PathBuf,

    /// Refuse to write when the config changed since it was read
    #[arg(
        long,
        global = true,
        env = "ESLINT_OFF_GUARD",
        help = "Fail instead of overwriting a config that changed on disk during the run"
    )]
    guard: bool,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Disable a rule in the configuration that applies to a path
    Disable {
        /// Rule to disable
        #[arg(
            help = "Rule name, e.g. no-console or @typescript-eslint/no-explicit-any",
            required_unless_present = "code"
        )]
        rule: Option<String>,

        /// Diagnostic code to take the rule name from
        #[arg(
            long,
            conflicts_with = "rule",
            help = "Diagnostic code as reported by an editor: a string or {\"value\": ...}"
        )]
        code: Option<String>,

        /// File or directory the search starts from
        #[arg(
            short,
            long,
            default_value = ".",
            help = "File or directory to start the search from"
        )]
        path: PathBuf,

        /// Show the new content without writing it
        #[arg(long, help = "Print the updated configuration without writing it")]
        dry_run: bool,
    },

    /// Show which configuration file applies to a path
    Locate {
        /// File or directory the search starts from
        #[arg(default_value = ".", help = "File or directory to start the search from")]
        path: PathBuf,
    },

    /// Print the decoded configuration that applies to a path
    Show {
        /// File or directory the search starts from
        #[arg(default_value = ".", help = "File or directory to start the search from")]
        path: PathBuf,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for editor integrations
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EvaluatorArg {
    /// Read literal `module.exports` / `export default` values
    Static,
    /// Load the module with Node.js
    Node,
}

impl From<EvaluatorArg> for EvaluatorKind {
    fn from(arg: EvaluatorArg) -> Self {
        match arg {
            EvaluatorArg::Static => EvaluatorKind::Static,
            EvaluatorArg::Node => EvaluatorKind::Node,
        }
    }
}

impl Cli {
    fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            evaluator: self.evaluator.into(),
            node_binary: self.node.clone(),
            guard_concurrent_edits: self.guard,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return ExitCode::SUCCESS;
    }

    // Initialize colored output
    let use_colors = !cli.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && is_terminal::is_terminal(io::stdout());
    colored::control::set_override(use_colors);

    // Initialize tracing based on verbosity
    if std::env::var_os("RUST_LOG").is_none() {
        let log_level = match cli.verbose {
            0 => "eslint_off=error",
            1 => "eslint_off=warn",
            2 => "eslint_off=info",
            3 => "eslint_off=debug",
            _ => "eslint_off=trace",
        };
        // SAFETY: single-threaded at this point, before any logging starts
        unsafe {
            std::env::set_var("RUST_LOG", log_level);
        }
    }
    init_tracing();

    let formatter = OutputFormatter::new(cli.format, use_colors);
    match run_command(cli, &formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Command failed: {:?}", e);
            formatter.print_error(&e);
            if e.is_actionable() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli, formatter: &OutputFormatter) -> eslint_off_core::Result<()> {
    let options = cli.codec_options();

    match cli.command {
        Some(Commands::Disable {
            rule,
            code,
            path,
            dry_run,
        }) => commands::disable_command(rule, code, path, dry_run, &options, formatter),

        Some(Commands::Locate { path }) => commands::locate_command(path, formatter),

        Some(Commands::Show { path }) => commands::show_command(path, &options, formatter),

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("eslint-off {}", eslint_off_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
            } else {
                println!("{}", eslint_off_core::VERSION);
            }
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
