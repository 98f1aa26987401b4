//! Command line interface for the packaging pipeline.
//!
//! One invocation runs every stage in order and narrates each boundary.
//! Configuration, environment and bundle failures stop the run with exit
//! status 1; installer problems only produce a warning block.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::{
    bundler::{
        self, InstallerOutcome, Pipeline, PipelineReport, RunStatus, Settings, Stage,
        environment, utils::process,
    },
    error::Result,
    metadata,
};
use std::{
    fmt::Display,
    io::IsTerminal,
    path::{Path, PathBuf},
};
use termcolor::Color;
use tokio::io::AsyncBufReadExt;

/// Lines of the stage log shown after a failure.
const LOG_TAIL_LINES: usize = 20;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let config = RuntimeConfig::from(&args);

    let settings = match metadata::load_settings(&args.project_dir) {
        Ok(settings) => settings,
        Err(e) => {
            let suggestions = e.recovery_suggestions();
            return Ok(fail(&config, "configuration", &e, None, &suggestions).await);
        }
    };
    config.verbose_println(&format!(
        "Project directory: {}",
        settings.project_dir().display()
    ))?;

    if args.verify_only {
        return verify_only(&settings, &config).await;
    }

    execute(Pipeline::new(settings), &config, args.skip_installer).await
}

async fn execute(pipeline: Pipeline, config: &RuntimeConfig, skip_installer: bool) -> Result<i32> {
    let settings = pipeline.settings();

    // Stage 1
    stage_header(config, Stage::Environment)?;
    config.progress(&format!(
        "Environment: {}",
        settings.venv_dir().display()
    ))?;
    let prepared = match pipeline.prepare_environment().await {
        Ok(prepared) => prepared,
        Err(e) => return Ok(fail_stage(&pipeline, config, Stage::Environment, e).await),
    };
    config.success(&format!(
        "{} environment with Python {}",
        if prepared.created { "Created" } else { "Reused" },
        prepared.version
    ))?;
    config.success(&format!(
        "Installed {} dependenc{} plus {}",
        prepared.requirements.len(),
        if prepared.requirements.len() == 1 { "y" } else { "ies" },
        settings.environment().bundler_package
    ))?;

    // Stage 2
    stage_header(config, Stage::Bundle)?;
    config.progress(&format!(
        "Removing {} and {}",
        settings.build_dir().display(),
        settings.dist_dir().display()
    ))?;
    config.progress("Running PyInstaller (this takes a while)")?;
    let bundle = match pipeline.bundle(&prepared).await {
        Ok(bundle) => bundle,
        Err(e) => return Ok(fail_stage(&pipeline, config, Stage::Bundle, e).await),
    };
    config.success(&format!("Launcher: {}", settings.launcher_path().display()))?;
    config.indent(&format!("Bundle size: {}", human_size(bundle.size)))?;
    config.verbose_println(&format!("SHA-256: {}", bundle.checksum))?;

    // Stage 3
    stage_header(config, Stage::Installer)?;
    let installer = pipeline.build_installer(skip_installer).await;
    report_installer(config, &installer)?;

    let report = PipelineReport::new(settings, &prepared, bundle, installer);
    match pipeline.write_report(&report).await {
        Ok(path) => config.verbose_println(&format!("Report: {}", path.display()))?,
        Err(e) => config.warn(&format!("Could not write packaging report: {}", e))?,
    }

    let output = config.output();
    match report.status {
        RunStatus::Success => output.status(
            &report.status.to_string(),
            Color::Green,
            "bundle and installer are ready",
        )?,
        RunStatus::PartialSuccess => output.status(
            &report.status.to_string(),
            Color::Yellow,
            &format!(
                "bundle is ready at {}; no installer was built",
                settings.app_dir().display()
            ),
        )?,
    }

    Ok(0)
}

fn stage_header(config: &RuntimeConfig, stage: Stage) -> std::io::Result<()> {
    let index = match stage {
        Stage::Environment => 1,
        Stage::Bundle => 2,
        Stage::Installer => 3,
    };
    config.section(&format!("[{index}/3] {}", stage.title()))
}

fn report_installer(config: &RuntimeConfig, outcome: &InstallerOutcome) -> std::io::Result<()> {
    match outcome {
        InstallerOutcome::Built(artifact) => {
            config.success(&format!("Installer: {}", artifact.path.display()))?;
            config.indent(&format!("Installer size: {}", human_size(artifact.size)))?;
            config.verbose_println(&format!("SHA-256: {}", artifact.checksum))
        }
        InstallerOutcome::ToolNotFound { script, searched } => {
            config.warn("Inno Setup compiler (ISCC) not found; the installer was not built")?;
            config.indent("Searched:")?;
            for location in searched {
                config.indent(&format!("  {location}"))?;
            }
            config.indent("To build the installer manually:")?;
            config.indent("  1. Install Inno Setup 6 from https://jrsoftware.org/isinfo.php")?;
            config.indent(&format!("  2. Run: ISCC \"{}\"", script.display()))?;
            config.indent("The bundle itself is complete and can be distributed as a folder.")
        }
        InstallerOutcome::OutputMissing { expected, log } => {
            config.warn(&format!(
                "Inno Setup finished but {} was not created",
                expected.display()
            ))?;
            config.indent(&format!("Compiler output: {}", log.display()))?;
            config.indent("Fix the problem reported there and compile the script in build/installer/ by hand.")
        }
        InstallerOutcome::Failed { error, log } => {
            config.warn(&format!("Installer build failed: {error}"))?;
            if let Some(log) = log {
                config.indent(&format!("Compiler output: {}", log.display()))?;
            }
            config.indent("The bundle itself is complete and can be distributed as a folder.")
        }
        InstallerOutcome::Skipped => config.progress("Skipped (--skip-installer)"),
    }
}

async fn verify_only(settings: &Settings, config: &RuntimeConfig) -> Result<i32> {
    config.section("Verifying environment")?;

    let env = match environment::existing(settings) {
        Ok(env) => env,
        Err(e) => return Ok(fail(config, "environment", &e, None, &[]).await),
    };
    let report = match environment::verify(settings, &env).await {
        Ok(report) => report,
        Err(e) => return Ok(fail(config, "environment", &e, None, &[]).await),
    };

    let output = config.output();
    for (check, passed, detail) in report.checks() {
        let line = format!("{check:<13} {detail}");
        if passed {
            config.success(&line)?;
        } else {
            output.error(&line)?;
        }
    }

    if report.passed() {
        output.status("VERIFIED", Color::Green, "environment is ready for packaging")?;
        Ok(0)
    } else {
        let failed = report.checks().iter().filter(|(_, passed, _)| !passed).count();
        output.status("FAILED", Color::Red, &format!("{failed} check(s) failed"))?;
        pause_if_interactive(config).await;
        Ok(1)
    }
}

/// Reports a failed stage. Falls back to the stage's own log when the error
/// does not name one.
async fn fail_stage(pipeline: &Pipeline, config: &RuntimeConfig, stage: Stage, error: bundler::Error) -> i32 {
    log::debug!("{} stage failed: {:?}", stage, error);
    let log = error.log_path().map(Path::to_path_buf).or_else(|| {
        let log = pipeline.log_path(stage);
        let has_content = std::fs::metadata(&log).map(|m| m.len() > 0).unwrap_or(false);
        has_content.then_some(log)
    });
    fail(config, &stage.to_string(), &error, log, &[]).await
}

/// Prints the failure block, waits for Enter when interactive, returns the exit code.
async fn fail(
    config: &RuntimeConfig,
    stage: &str,
    error: &dyn Display,
    log: Option<PathBuf>,
    suggestions: &[String],
) -> i32 {
    let output = config.output();
    let _ = output.error(&format!("{stage} stage failed"));
    let _ = output.detail(&error.to_string());

    if let Some(log) = log {
        let _ = output.detail(&format!("Log file: {}", log.display()));
        let tail = process::tail_lines(&log, LOG_TAIL_LINES).await;
        if !tail.is_empty() {
            let _ = output.detail(&format!("Last {} line(s):", tail.len()));
            for line in tail {
                let _ = output.detail(&format!("  {line}"));
            }
        }
    }
    for suggestion in suggestions {
        let _ = output.detail(&format!("Hint: {suggestion}"));
    }

    let _ = output.status("FAILED", Color::Red, &format!("packaging stopped in the {stage} stage"));
    pause_if_interactive(config).await;
    1
}

async fn pause_if_interactive(config: &RuntimeConfig) {
    if !config.pause_on_failure() || !std::io::stdin().is_terminal() {
        return;
    }
    eprintln!("\nPress Enter to exit...");
    let mut line = String::new();
    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
    if let Err(e) = stdin.read_line(&mut line).await {
        log::debug!("Failed to read from stdin: {}", e);
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
