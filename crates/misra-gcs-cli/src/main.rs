//! misra-gcs CLI tool.
//!
//! Usage:
//! ```bash
//! misra-gcs check [OPTIONS] [PATH]
//! misra-gcs list-tools
//! misra-gcs init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// MISRA guideline compliance summary from static analysis warnings and
/// suppression comments
#[derive(Parser)]
#[command(name = "misra-gcs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce a guideline compliance summary
    Check {
        /// Workspace root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Static analysis tool that produced the warnings
        #[arg(short, long)]
        tool: Option<String>,

        /// MISRA version: 1998, 2004, 2012 or C++
        #[arg(long)]
        misra_version: Option<String>,

        /// Analyzer output file, one warning per line
        #[arg(short, long)]
        warnings: Option<PathBuf>,

        /// File listing the source files to scan, one path or glob per line
        #[arg(short, long)]
        sources: Option<PathBuf>,

        /// Guideline recategorization plan
        #[arg(long)]
        grp: Option<PathBuf>,

        /// Audit log to write
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Directory holding the per-version reference documents
        #[arg(long)]
        references: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Fail when errors occurred during processing (`--fail-on-error false` to disable)
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        fail_on_error: Option<bool>,

        /// Fail when the code is not compliant
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        fail_on_noncompliance: Option<bool>,
    },

    /// List supported static analysis tools
    ListTools,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for the compliance summary.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON compliance report.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            tool,
            misra_version,
            warnings,
            sources,
            grp,
            log_file,
            references,
            format,
            fail_on_error,
            fail_on_noncompliance,
        } => {
            let config = config_resolver::load_config(&path, cli.config.as_deref())?;
            let overrides = commands::check::Overrides {
                tool,
                misra_version,
                warnings,
                sources,
                grp,
                log_file,
                references,
                fail_on_error,
                fail_on_noncompliance,
            };
            commands::check::run(&path, format, overrides, config)
        }
        Commands::ListTools => {
            commands::list_tools::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
