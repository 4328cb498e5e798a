//! CLI module for TestUp
//!
//! ## Commands
//!
//! - `discover <ROOT>...` - Load test sources and list the discovered suites
//! - `report <RESULTS>` - Replay a run's results through the active reporters
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::settings::{DiscoveryConfig, Settings};
use crate::version::TESTUP_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Discovery finished but at least one test source failed to load.
    pub const LOAD_ERRORS: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Test discovery and reporting for Lua test sources
#[derive(Parser, Debug)]
#[command(name = "testup")]
#[command(version = TESTUP_VERSION)]
#[command(about = "Discover, reload and report Lua test suites", long_about = None)]
pub struct Cli {
    /// Run as the host UI's reporter (replaces console reporting)
    #[arg(short = 't', long = "testup", global = true)]
    pub testup: bool,

    /// Verbose console output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load test sources under each root and list what was discovered
    Discover {
        /// Suite root directories
        #[arg(value_name = "ROOT", required = true)]
        roots: Vec<PathBuf>,
        /// Print suites as JSON
        #[arg(long)]
        json: bool,
        /// Print run selectors instead of display names
        #[arg(long, conflicts_with = "json")]
        selectors: bool,
        /// Test source file name prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
        /// Test source extension
        #[arg(long, value_name = "EXT")]
        extension: Option<String>,
    },

    /// Feed recorded test results (JSON) through the reporters
    Report {
        /// JSON file with one entry per completed test
        #[arg(value_name = "RESULTS")]
        results: PathBuf,
    },
}

impl Cli {
    /// Settings implied by the global flags and the subcommand's options.
    pub fn settings(&self) -> Settings {
        let mut discovery = DiscoveryConfig::default();
        if let Command::Discover { prefix, extension, .. } = &self.command {
            if let Some(prefix) = prefix {
                discovery = discovery.with_file_prefix(prefix.clone());
            }
            if let Some(extension) = extension {
                discovery = discovery.with_source_extension(extension.clone());
            }
        }
        Settings::new()
            .with_run_in_gui(self.testup)
            .with_verbose(self.verbose)
            .with_discovery(discovery)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code != ExitCode::SUCCESS {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let settings = cli.settings();
    match cli.command {
        Command::Discover {
            roots, json, selectors, ..
        } => {
            let format = if json {
                commands::ListFormat::Json
            } else if selectors {
                commands::ListFormat::Selectors
            } else {
                commands::ListFormat::Names
            };
            commands::discover(&roots, &settings, format)
        }
        Command::Report { results } => commands::report(&results, &settings),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_discover() {
        let cli = Cli::try_parse_from(["testup", "discover", "tests/TestUp", "tests/Other"]).unwrap();
        if let Command::Discover { roots, json, .. } = &cli.command {
            assert_eq!(roots.len(), 2);
            assert!(!json);
        } else {
            panic!("Expected Discover command");
        }
        assert!(!cli.settings().run_in_gui);
    }

    #[test]
    fn test_cli_parse_testup_flag() {
        let cli = Cli::try_parse_from(["testup", "-t", "discover", "suite"]).unwrap();
        assert!(cli.testup);
        assert!(cli.settings().run_in_gui);

        let cli = Cli::try_parse_from(["testup", "report", "results.json", "--testup"]).unwrap();
        assert!(cli.settings().run_in_gui);
    }

    #[test]
    fn test_cli_parse_discovery_overrides() {
        let cli =
            Cli::try_parse_from(["testup", "discover", "suite", "--prefix", "Spec_", "--extension", ".luau"]).unwrap();
        let settings = cli.settings();
        assert_eq!(settings.discovery.file_prefix, "Spec_");
        assert_eq!(settings.discovery.source_extension, "luau");
    }

    #[test]
    fn test_cli_requires_a_root() {
        assert!(Cli::try_parse_from(["testup", "discover"]).is_err());
    }

    #[test]
    fn test_cli_json_conflicts_with_selectors() {
        assert!(Cli::try_parse_from(["testup", "discover", "suite", "--json", "--selectors"]).is_err());
    }
}
