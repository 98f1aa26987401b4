//! Inno Setup compiler discovery.
//!
//! The compiler is located, never downloaded. Search order:
//!
//! 1. `iscc` / `ISCC` on `PATH`
//! 2. `%ProgramFiles(x86)%\Inno Setup 6\ISCC.exe`
//! 3. `%ProgramFiles%\Inno Setup 6\ISCC.exe`
//!
//! The first match wins.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

const PATH_NAMES: [&str; 2] = ["iscc", "ISCC"];
const INSTALL_DIR: &str = "Inno Setup 6";
const COMPILER_EXE: &str = "ISCC.exe";
const DEFAULT_PROGRAM_FILES_X86: &str = r"C:\Program Files (x86)";
const DEFAULT_PROGRAM_FILES: &str = r"C:\Program Files";

/// Where the compiler was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerSource {
    Path,
    ProgramFilesX86,
    ProgramFiles,
}

impl fmt::Display for CompilerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerSource::Path => write!(f, "PATH"),
            CompilerSource::ProgramFilesX86 => write!(f, "%ProgramFiles(x86)%"),
            CompilerSource::ProgramFiles => write!(f, "%ProgramFiles%"),
        }
    }
}

/// A located Inno Setup command-line compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnoCompiler {
    pub path: PathBuf,
    pub source: CompilerSource,
}

/// Inputs to compiler discovery, captured from the process environment.
#[derive(Debug, Clone, Default)]
pub struct ToolSearch {
    pub path: Option<OsString>,
    pub program_files_x86: Option<PathBuf>,
    pub program_files: Option<PathBuf>,
    pub cwd: PathBuf,
}

impl ToolSearch {
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os("PATH"),
            program_files_x86: std::env::var_os("ProgramFiles(x86)").map(PathBuf::from),
            program_files: std::env::var_os("ProgramFiles").map(PathBuf::from),
            cwd: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// Well-known install locations, in search order.
    pub fn install_locations(&self) -> [(CompilerSource, PathBuf); 2] {
        let x86 = self
            .program_files_x86
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_FILES_X86));
        let native = self
            .program_files
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_FILES));
        [
            (CompilerSource::ProgramFilesX86, compiler_in(&x86)),
            (CompilerSource::ProgramFiles, compiler_in(&native)),
        ]
    }

    /// Human-readable list of everything searched.
    pub fn describe(&self) -> Vec<String> {
        let mut searched = vec![format!("{} on PATH", PATH_NAMES.join(" / "))];
        searched.extend(
            self.install_locations()
                .into_iter()
                .map(|(_, path)| path.display().to_string()),
        );
        searched
    }
}

fn compiler_in(program_files: &Path) -> PathBuf {
    program_files.join(INSTALL_DIR).join(COMPILER_EXE)
}

/// Locates the compiler. `None` means Inno Setup is not installed.
pub fn discover_compiler(search: &ToolSearch) -> Option<InnoCompiler> {
    if let Some(path) = &search.path {
        for name in PATH_NAMES {
            if let Ok(found) = which::which_in(name, Some(path), &search.cwd) {
                return Some(InnoCompiler {
                    path: found,
                    source: CompilerSource::Path,
                });
            }
        }
    }

    search
        .install_locations()
        .into_iter()
        .find(|(_, path)| path.is_file())
        .map(|(source, path)| InnoCompiler { path, source })
}
