//! Subprocess execution with output captured to per-stage log files.
//!
//! Every external tool the pipeline drives is a blocking, opaque subprocess.
//! Its stdout and stderr go to a log file so the operator can inspect them
//! after a failure; the pipeline itself only looks at the exit status.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    fs::OpenOptions,
    path::Path,
    process::{ExitStatus, Stdio},
};
use tokio::process::Command;

/// Renders a command line for messages and logs.
pub fn describe(command: &Command) -> String {
    let std_command = command.as_std();
    std::iter::once(std_command.get_program())
        .chain(std_command.get_args())
        .map(|part| {
            let part = part.to_string_lossy();
            if part.contains(' ') {
                format!("\"{part}\"")
            } else {
                part.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncates (or creates) a stage log so a new run does not mix with the last one.
pub async fn reset_log(log: &Path) -> Result<()> {
    if let Some(parent) = log.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating log directory", parent)?;
    }
    tokio::fs::write(log, b"")
        .await
        .fs_context("resetting log file", log)
}

/// Runs `command` to completion with stdout and stderr appended to `log`.
///
/// Only a failure to spawn is an error here; callers decide what a non-zero
/// exit status means for their stage.
pub async fn run_logged(mut command: Command, log: &Path) -> Result<ExitStatus> {
    let rendered = describe(&command);
    log::debug!("Running: {}", rendered);

    if let Some(parent) = log.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating log directory", parent)?;
    }

    let mut stdout = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log)
        .fs_context("opening log file", log)?;
    {
        use std::io::Write;
        writeln!(stdout, "$ {rendered}").fs_context("writing log file", log)?;
    }
    let stderr = stdout.try_clone().fs_context("opening log file", log)?;

    command
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .status()
        .await
        .map_err(|error| Error::CommandFailed {
            command: rendered,
            error,
        })
}

/// Runs `command` and returns its exit status and captured stdout.
///
/// Used for short probes (interpreter version, installed packages) whose
/// output is data rather than progress.
pub async fn capture(mut command: Command) -> Result<(ExitStatus, String)> {
    let rendered = describe(&command);
    log::debug!("Probing: {}", rendered);

    let output = command
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: rendered,
            error,
        })?;

    if !output.stderr.is_empty() {
        log::debug!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim());
    }

    Ok((
        output.status,
        String::from_utf8_lossy(&output.stdout).into_owned(),
    ))
}

/// Last `count` lines of a log file; empty if the file cannot be read.
pub async fn tail_lines(log: &Path, count: usize) -> Vec<String> {
    match tokio::fs::read_to_string(log).await {
        Ok(content) => {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(count);
            lines[start..].iter().map(|l| l.to_string()).collect()
        }
        Err(e) => {
            log::debug!("Cannot read log {}: {}", log.display(), e);
            Vec::new()
        }
    }
}
