//! Python interpreter discovery, version handling and the environment
//! activation context.

use crate::bundler::error::{Error, Result};
use crate::bundler::utils::process;
use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use tokio::process::Command;

/// Interpreters tried, in order, when none is configured.
const SYSTEM_PYTHON_CANDIDATES: [&str; 3] = ["python3", "python", "py"];

const VERSION_PROBE: &str = "import sys; print('%d.%d.%d' % sys.version_info[:3])";

/// A CPython version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PythonVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for PythonVersion {
    type Err = Error;

    /// Accepts `3.12`, `3.12.4`, `Python 3.13.0rc1`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix("Python").unwrap_or(trimmed).trim();

        let mut numbers = trimmed.split('.').map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u32>().ok()
        });

        match (numbers.next().flatten(), numbers.next().flatten()) {
            (Some(major), Some(minor)) => {
                let patch = numbers.next().flatten().unwrap_or(0);
                Ok(Self::new(major, minor, patch))
            }
            _ => Err(Error::GenericError(format!(
                "unrecognized Python version `{}`",
                s.trim()
            ))),
        }
    }
}

impl<'de> serde::Deserialize<'de> for PythonVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for PythonVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How an interpreter version relates to the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    /// Within `min..=max_tested` (compared on major.minor for the upper bound).
    Supported,
    /// Below the minimum; the application will not run.
    TooOld,
    /// Newer than anything tested; accepted with a warning.
    Untested,
}

/// Classifies `found` against the supported range.
pub fn classify(found: PythonVersion, min: PythonVersion, max_tested: PythonVersion) -> VersionStatus {
    if found < min {
        VersionStatus::TooOld
    } else if (found.major, found.minor) > (max_tested.major, max_tested.minor) {
        VersionStatus::Untested
    } else {
        VersionStatus::Supported
    }
}

/// Locates the interpreter used to create the environment.
///
/// A configured interpreter (path or name) is used as-is and is not
/// silently replaced by another one when missing.
pub fn find_system_python(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(configured) = configured {
        let as_path = Path::new(configured);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }
        return which::which(configured).map_err(|_| Error::PythonNotFound {
            tried: configured.to_string(),
        });
    }

    for candidate in SYSTEM_PYTHON_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            log::debug!("Found system interpreter {} at {}", candidate, path.display());
            return Ok(path);
        }
    }

    Err(Error::PythonNotFound {
        tried: SYSTEM_PYTHON_CANDIDATES.join(", "),
    })
}

/// An isolated Python environment, passed explicitly to every command that
/// must run inside it.
///
/// "Activating" the environment never touches this process's own
/// environment variables; [`PythonEnv::command`] applies `VIRTUAL_ENV` and the
/// `PATH` prefix to each child process instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonEnv {
    root: PathBuf,
    scripts_dir: PathBuf,
    interpreter: PathBuf,
}

impl PythonEnv {
    /// The environment rooted at `root` (it may not exist yet).
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let (scripts_dir, interpreter) = if cfg!(target_os = "windows") {
            let scripts = root.join("Scripts");
            let python = scripts.join("python.exe");
            (scripts, python)
        } else {
            let bin = root.join("bin");
            let python = bin.join("python");
            (bin, python)
        };
        Self {
            root,
            scripts_dir,
            interpreter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Whether the environment's interpreter exists.
    pub fn is_present(&self) -> bool {
        self.interpreter.is_file()
    }

    /// A command running the environment's interpreter with the environment applied.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .env("VIRTUAL_ENV", &self.root)
            .env("PATH", self.search_path())
            .env_remove("PYTHONHOME");
        command
    }

    /// `python -m <module>` inside the environment.
    pub fn module(&self, module: &str) -> Command {
        let mut command = self.command();
        command.arg("-m").arg(module);
        command
    }

    /// Asks the interpreter for its version.
    pub async fn version(&self) -> Result<PythonVersion> {
        let mut command = self.command();
        command.arg("-c").arg(VERSION_PROBE);
        let (status, stdout) = process::capture(command).await?;
        if !status.success() {
            return Err(Error::GenericError(format!(
                "{} could not report its version ({})",
                self.interpreter.display(),
                status
            )));
        }
        stdout.parse()
    }

    fn search_path(&self) -> OsString {
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let dirs = std::iter::once(self.scripts_dir.clone()).chain(std::env::split_paths(&inherited));
        std::env::join_paths(dirs).unwrap_or(inherited)
    }
}
