//! Command line argument parsing.

use clap::{ArgAction, Parser, builder::FalseyValueParser};
use std::path::PathBuf;

/// Packaging pipeline for the Smart Class Planner desktop application
#[derive(Parser, Debug)]
#[command(
    name = "planner_bundler",
    version,
    about = "Packages the Smart Class Planner into a standalone bundle and a Windows installer",
    long_about = "Prepares the isolated Python environment, bundles the application with PyInstaller \
and wraps the bundle into an Inno Setup installer.

Run it from the project directory (the one holding bundle.toml and installer.toml):
  planner_bundler
  planner_bundler --verify-only
  planner_bundler -C path/to/project --skip-installer --no-pause

Exit code 0 = the bundle exists at dist/<name>/. A missing installer is reported as a warning."
)]
pub struct Args {
    /// Project directory containing bundle.toml, installer.toml and requirements.txt
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        env = "PLANNER_BUNDLER_PROJECT",
        default_value = "."
    )]
    pub project_dir: PathBuf,

    /// Do not wait for Enter after a failure, even on a terminal
    #[arg(
        long,
        env = "PLANNER_BUNDLER_NO_PAUSE",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub no_pause: bool,

    /// Check the prepared environment and the bundle manifest without building anything
    #[arg(long, conflicts_with = "skip_installer")]
    pub verify_only: bool,

    /// Stop after the bundle stage
    #[arg(long)]
    pub skip_installer: bool,

    /// Show more detail
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print problems and the final status
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    pause_on_failure: bool,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
            pause_on_failure: !args.no_pause,
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Whether a failure waits for Enter (only honored on a terminal).
    pub fn pause_on_failure(&self) -> bool {
        self.pause_on_failure
    }

    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
