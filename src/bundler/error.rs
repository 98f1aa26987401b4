//! Error types for the packaging stages.
//!
//! Stage failures are always derived from an exit status or from the
//! presence of an expected file, never from the text a tool printed. The
//! variants that come from a subprocess carry the path of the log file the
//! subprocess wrote to, so the CLI can point the operator at it.

use crate::bundler::environment::PythonVersion;
use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
    process::ExitStatus,
};

/// Result type for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing, bundling, or building the installer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Free-form failure.
    #[error("{0}")]
    GenericError(String),

    /// An error with an added description of what was being attempted.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// File system operation failed on a specific path.
    #[error("{context} `{}`: {error}", path.display())]
    Fs {
        context: &'static str,
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    /// A subprocess could not be spawned at all.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        command: String,
        #[source]
        error: io::Error,
    },

    /// A subprocess ran and exited unsuccessfully.
    #[error("`{tool}` failed ({status}); output in {}", log.display())]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        log: PathBuf,
    },

    /// The bundler finished but the launcher binary is not where it must be.
    #[error(
        "bundling did not produce the launcher at {}; output in {}",
        expected.display(),
        log.display()
    )]
    LauncherMissing { expected: PathBuf, log: PathBuf },

    /// No interpreter was found to create the isolated environment with.
    #[error("no Python interpreter found (tried: {tried})")]
    PythonNotFound { tried: String },

    /// The environment's interpreter is below the configured minimum.
    #[error("Python {found} is older than the required {required}")]
    PythonTooOld {
        found: PythonVersion,
        required: PythonVersion,
    },

    /// Application modules exist that the bundle manifest does not declare.
    #[error(
        "bundle manifest does not declare {} application module(s): {}",
        modules.len(),
        modules.join(", ")
    )]
    ManifestIncomplete { modules: Vec<String> },

    /// The bundle manifest declares application modules that do not exist.
    #[error(
        "bundle manifest declares {} module(s) missing from the application package: {}",
        modules.len(),
        modules.join(", ")
    )]
    ManifestUnknownModules { modules: Vec<String> },

    /// Installer version is not a semantic version.
    #[error("invalid installer version `{version}`: {error}")]
    Version {
        version: String,
        #[source]
        error: semver::Error,
    },

    #[error(transparent)]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error(transparent)]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    GlobPattern(#[from] glob::PatternError),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),
}

impl Error {
    /// Log file holding the output of the subprocess behind this error.
    pub fn log_path(&self) -> Option<&Path> {
        match self {
            Error::ToolFailed { log, .. } | Error::LauncherMissing { log, .. } => Some(log),
            Error::Context { source, .. } => source.log_path(),
            _ => None,
        }
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(error: handlebars::TemplateError) -> Self {
        Error::Template(Box::new(error))
    }
}

/// Attach a path and a description to I/O errors.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Attach a description to any bundler result or turn `None` into an error.
pub trait Context<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context {
            context: context.to_string(),
            source: Box::new(e),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
