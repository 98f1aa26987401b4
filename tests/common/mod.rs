//! Common test utilities for planner_bundler integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for the system interpreter and the environment's interpreter.
///
/// `-m venv DIR` copies the script to `DIR/bin/python`, so the created
/// environment runs the same stub. Behavior is steered by `STUB_*` variables.
const PYTHON_STUB: &str = r#"#!/bin/sh
echo "python $*" >> "$STUB_LOG"
if [ "$1" = "-c" ]; then
  if [ -n "$STUB_IMPORT_FAIL" ]; then
    case "$2" in *"$STUB_IMPORT_FAIL"*) echo "ModuleNotFoundError" >&2; exit 1 ;; esac
  fi
  case "$2" in
    *tkinter*) exit "${STUB_TK_EXIT:-0}" ;;
    *) echo "${STUB_PY_VERSION:-3.12.4}"; exit 0 ;;
  esac
fi
if [ "$1" = "-m" ]; then
  module="$2"
  shift 2
  case "$module" in
    venv)
      mkdir -p "$1/bin"
      cp "$0" "$1/bin/python"
      chmod +x "$1/bin/python"
      exit "${STUB_VENV_EXIT:-0}" ;;
    pip)
      if [ "$1" = "list" ]; then
        if [ -f "$STUB_FREEZE_FILE" ]; then cat "$STUB_FREEZE_FILE"; fi
        exit 0
      fi
      echo "Successfully installed stub-packages"
      exit "${STUB_PIP_EXIT:-0}" ;;
    PyInstaller)
      dist=""
      spec=""
      while [ $# -gt 0 ]; do
        case "$1" in
          --distpath) dist="$2"; shift 2 ;;
          --workpath) shift 2 ;;
          --*) shift ;;
          *) spec="$1"; shift ;;
        esac
      done
      name=$(basename "$spec" .spec)
      echo "Building $name into $dist"
      if [ -z "$STUB_NO_LAUNCHER" ]; then
        mkdir -p "$dist/$name/_internal"
        echo "launcher" > "$dist/$name/$name"
        echo "lib" > "$dist/$name/_internal/base_library.zip"
      else
        echo "ERROR: hidden import smart_class_planner.presentation not found" >&2
      fi
      exit "${STUB_PYI_EXIT:-0}" ;;
  esac
fi
echo "unexpected invocation: $*" >&2
exit 2
"#;

/// Stand-in for the Inno Setup compiler; honors `/O` and `/F`.
const ISCC_STUB: &str = r#"#!/bin/sh
echo "iscc $*" >> "$STUB_LOG"
out=""
base=""
for arg in "$@"; do
  case "$arg" in
    /O*) out="${arg#/O}" ;;
    /F*) base="${arg#/F}" ;;
  esac
done
if [ -z "$STUB_ISCC_NO_OUTPUT" ]; then
  mkdir -p "$out"
  echo "setup" > "$out/$base.exe"
fi
exit "${STUB_ISCC_EXIT:-0}"
"#;

pub const BUNDLE_TOML: &str = r#"[bundle]
name = "SmartClassPlanner"
entry_point = "smart_class_planner/main.py"
package = "smart_class_planner"
hidden_imports = [
    "smart_class_planner.main",
    "smart_class_planner.domain.course",
    "smart_class_planner.presentation.setup_wizard",
]
datas = [{ source = "data/*.xlsx", dest = "data" }]
"#;

pub const INSTALLER_TOML: &str = r#"name = "Smart Class Planner"
version = "1.0.0"
publisher = "Planner Team"
identifier = "edu.example.smart-class-planner"
"#;

/// A throwaway project directory plus a directory of tool stubs.
pub struct TestProject {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Project root (holds bundle.toml)
    pub path: PathBuf,
    /// Directory prepended to PATH
    pub stubs: PathBuf,
}

impl TestProject {
    /// Create a complete, bundleable project with a Python stub on PATH
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("project");
        let stubs = temp.path().join("stubs");
        std::fs::create_dir_all(&path).expect("Failed to create project directory");
        std::fs::create_dir_all(&stubs).expect("Failed to create stub directory");

        let project = Self { temp, path, stubs };
        project.write_file("requirements.txt", "openpyxl==3.1.2\nbeautifulsoup4\n");
        project.write_file("bundle.toml", BUNDLE_TOML);
        project.write_file("installer.toml", INSTALLER_TOML);
        project.write_file("smart_class_planner/__init__.py", "");
        project.write_file("smart_class_planner/main.py", "print('planner')\n");
        project.write_file("smart_class_planner/domain/__init__.py", "");
        project.write_file("smart_class_planner/domain/course.py", "");
        project.write_file("smart_class_planner/presentation/setup_wizard.py", "");
        project.write_file("data/4-year schedule.xlsx", "xlsx");
        project.install_stub("python3", PYTHON_STUB);
        project
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a path exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Put an Inno Setup compiler stub on PATH
    pub fn install_iscc(&self) {
        self.install_stub("iscc", ISCC_STUB);
    }

    /// Put an ISCC on PATH whose interpreter does not exist, so it cannot be spawned
    pub fn install_unspawnable_iscc(&self) {
        self.install_stub("iscc", "#!/nonexistent/interpreter\n");
    }

    /// Remove the interpreter stub from PATH
    pub fn remove_python(&self) {
        std::fs::remove_file(self.stubs.join("python3")).expect("Failed to remove stub");
    }

    /// Every tool invocation recorded by the stubs
    pub fn invocations(&self) -> Vec<String> {
        std::fs::read_to_string(self.stub_log())
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    pub fn stub_log(&self) -> PathBuf {
        self.temp.path().join("stub.log")
    }

    /// The bundler binary, running in the project with only the stubs and
    /// the base system directories on PATH
    pub fn command(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("planner_bundler").unwrap();
        let search_path = std::env::join_paths([
            self.stubs.clone(),
            PathBuf::from("/usr/bin"),
            PathBuf::from("/bin"),
        ])
        .expect("Failed to build PATH");

        cmd.current_dir(&self.path)
            .env("PATH", search_path)
            .env("ProgramFiles(x86)", self.temp.path().join("pf86"))
            .env("ProgramFiles", self.temp.path().join("pf"))
            .env("STUB_LOG", self.stub_log())
            .env("PLANNER_BUNDLER_NO_PAUSE", "1")
            .env_remove("PLANNER_BUNDLER_PROJECT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn install_stub(&self, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.stubs.join(name);
        std::fs::write(&path, script).expect("Failed to write stub");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make stub executable");
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Count of recorded invocations containing `needle`
pub fn count_matching(lines: &[String], needle: &str) -> usize {
    lines.iter().filter(|line| line.contains(needle)).count()
}

/// Path of a file inside the project, for assertions on absolute paths
pub fn project_path(project: &TestProject, rel: &str) -> PathBuf {
    Path::new(&project.path).join(rel)
}
