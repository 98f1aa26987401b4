//! End-to-end pipeline tests using the REAL planner_bundler binary with
//! shell stand-ins for the interpreter, PyInstaller and ISCC

#![cfg(unix)]

mod common;

use common::{TestProject, count_matching};
use predicates::prelude::*;

#[test]
fn test_full_run_without_inno_setup_is_partial_success() {
    let project = TestProject::new();

    project
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/3] Preparing environment"))
        .stdout(predicate::str::contains("[2/3] Bundling application"))
        .stdout(predicate::str::contains("[3/3] Building installer"))
        .stdout(predicate::str::contains("PARTIAL SUCCESS"))
        .stderr(predicate::str::contains("Inno Setup compiler (ISCC) not found"));

    assert!(project.file_exists("dist/SmartClassPlanner/SmartClassPlanner"));
    assert!(project.file_exists("build/installer/SmartClassPlanner.iss"));
    assert!(!project.file_exists("installer_output/SmartClassPlanner-1.0.0-setup.exe"));

    let report: serde_json::Value =
        serde_json::from_str(&project.read_file("dist/packaging-report.json")).unwrap();
    assert_eq!(report["status"], "partial-success");
    assert_eq!(report["python"], "3.12.4");
    assert_eq!(report["installer"]["status"], "tool-not-found");
    assert_eq!(report["bundle"]["kind"], "app-directory");
}

#[test]
fn test_full_run_with_inno_setup_builds_version_stamped_installer() {
    let project = TestProject::new();
    project.install_iscc();

    project
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"))
        .stdout(predicate::str::contains("PARTIAL").not())
        .stdout(predicate::str::contains("SmartClassPlanner-1.0.0-setup.exe"));
    assert!(project.file_exists("installer_output/SmartClassPlanner-1.0.0-setup.exe"));

    let iss = std::fs::read(project.path.join("build/installer/SmartClassPlanner.iss")).unwrap();
    assert_eq!(&iss[..3], &[0xEF, 0xBB, 0xBF]);
    let iss = String::from_utf8_lossy(&iss[3..]).into_owned();
    assert!(iss.contains("AppVersion=1.0.0"));
    assert!(iss.contains("PrivilegesRequired=lowest"));

    project.write_file(
        "installer.toml",
        &common::INSTALLER_TOML.replace("1.0.0", "1.0.1"),
    );
    project.command().assert().success();

    assert!(project.file_exists("installer_output/SmartClassPlanner-1.0.0-setup.exe"));
    assert!(project.file_exists("installer_output/SmartClassPlanner-1.0.1-setup.exe"));

    let second = std::fs::read_to_string(project.path.join("build/installer/SmartClassPlanner.iss")).unwrap();
    let app_id = |script: &str| {
        script
            .lines()
            .find(|line| line.starts_with("AppId="))
            .map(String::from)
    };
    assert_eq!(app_id(&iss), app_id(&second));
}

#[test]
fn test_environment_is_created_once_and_reused() {
    let project = TestProject::new();

    project
        .command()
        .arg("--skip-installer")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created environment with Python 3.12.4"));

    project
        .command()
        .arg("--skip-installer")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reused environment with Python 3.12.4"))
        .stdout(predicate::str::contains("Skipped (--skip-installer)"));

    let calls = project.invocations();
    assert_eq!(count_matching(&calls, "-m venv"), 1);
    assert_eq!(count_matching(&calls, "-m pip install"), 2);
    assert!(project.file_exists("venv/bin/python"));
}

#[test]
fn test_broken_environment_directory_is_recreated() {
    let project = TestProject::new();
    project.write_file("venv/pyvenv.cfg", "home = /nowhere\n");

    project.command().arg("--skip-installer").assert().success();

    assert!(project.file_exists("venv/bin/python"));
    assert!(!project.file_exists("venv/pyvenv.cfg"));
}

#[test]
fn test_stale_build_output_is_removed() {
    let project = TestProject::new();
    project.write_file("dist/SmartClassPlanner/_internal/removed_module.pyc", "old");
    project.write_file("build/work/old.toc", "old");

    project.command().arg("--skip-installer").assert().success();

    assert!(!project.file_exists("dist/SmartClassPlanner/_internal/removed_module.pyc"));
    assert!(!project.file_exists("build/work/old.toc"));
    assert!(project.file_exists("dist/SmartClassPlanner/SmartClassPlanner"));
}

#[test]
fn test_missing_launcher_fails_and_points_at_log() {
    let project = TestProject::new();

    project
        .command()
        .env("STUB_NO_LAUNCHER", "1")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("bundle stage failed"))
        .stderr(predicate::str::contains(".planner_bundler/logs/bundle.log"))
        .stderr(predicate::str::contains("hidden import smart_class_planner.presentation not found"));

    assert!(!project.file_exists("dist/packaging-report.json"));
    assert_eq!(count_matching(&project.invocations(), "iscc"), 0);
}

#[test]
fn test_launcher_presence_wins_over_bundler_exit_status() {
    let project = TestProject::new();

    project
        .command()
        .arg("--skip-installer")
        .env("STUB_PYI_EXIT", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("PARTIAL SUCCESS"));
}

#[test]
fn test_installer_without_output_is_a_warning() {
    let project = TestProject::new();
    project.install_iscc();

    project
        .command()
        .env("STUB_ISCC_NO_OUTPUT", "1")
        .env("STUB_ISCC_EXIT", "2")
        .assert()
        .success()
        .stdout(predicate::str::contains("PARTIAL SUCCESS"))
        .stderr(predicate::str::contains("was not created"));

    let report: serde_json::Value =
        serde_json::from_str(&project.read_file("dist/packaging-report.json")).unwrap();
    assert_eq!(report["installer"]["status"], "output-missing");
}

#[test]
fn test_installer_compiler_that_cannot_run_is_a_warning() {
    let project = TestProject::new();
    project.install_unspawnable_iscc();

    project
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("PARTIAL SUCCESS"))
        .stdout(predicate::str::contains("FAILED").not())
        .stderr(predicate::str::contains("Installer build failed"))
        .stderr(predicate::str::contains("failed to run"));

    let report: serde_json::Value =
        serde_json::from_str(&project.read_file("dist/packaging-report.json")).unwrap();
    assert_eq!(report["status"], "partial-success");
    assert_eq!(report["installer"]["status"], "failed");
    assert!(project.file_exists("build/installer/SmartClassPlanner.iss"));
}

#[test]
fn test_dependency_install_failure_is_fatal() {
    let project = TestProject::new();

    project
        .command()
        .env("STUB_PIP_EXIT", "1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("environment stage failed"))
        .stderr(predicate::str::contains(".planner_bundler/logs/environment.log"))
        .stderr(predicate::str::contains("Successfully installed stub-packages"));

    assert_eq!(count_matching(&project.invocations(), "PyInstaller"), 0);
}

#[test]
fn test_old_python_is_fatal() {
    let project = TestProject::new();

    project
        .command()
        .env("STUB_PY_VERSION", "3.11.9")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Python 3.11.9 is older than the required 3.12.0"));
}

#[test]
fn test_missing_interpreter_is_fatal() {
    let project = TestProject::new();
    project.remove_python();

    project
        .command()
        .env("PATH", &project.stubs)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no Python interpreter found"));
}

#[test]
fn test_undeclared_module_stops_before_bundling() {
    let project = TestProject::new();
    project.write_file("smart_class_planner/infrastructure/pdf_parser.py", "");

    project
        .command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bundle stage failed"))
        .stderr(predicate::str::contains(
            "smart_class_planner.infrastructure.pdf_parser",
        ));

    assert_eq!(count_matching(&project.invocations(), "PyInstaller"), 0);
    assert!(!project.file_exists("dist/SmartClassPlanner"));
}

#[test]
fn test_verify_only_requires_prepared_environment() {
    let project = TestProject::new();

    project
        .command()
        .arg("--verify-only")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no prepared environment"));

    assert!(!project.file_exists("venv"));
}

#[test]
fn test_verify_only_reports_each_check() {
    let project = TestProject::new();
    project.command().arg("--skip-installer").assert().success();

    let freeze = project.temp.path().join("freeze.txt");
    std::fs::write(&freeze, "openpyxl==3.1.2\nbeautifulsoup4==4.12.3\n").unwrap();
    project
        .command()
        .arg("--verify-only")
        .env("STUB_FREEZE_FILE", &freeze)
        .assert()
        .success()
        .stdout(predicate::str::contains("Python"))
        .stdout(predicate::str::contains("Tkinter"))
        .stdout(predicate::str::contains("all installed"))
        .stdout(predicate::str::contains("manifest complete"))
        .stdout(predicate::str::contains("VERIFIED"));

    std::fs::write(&freeze, "openpyxl==3.1.2\n").unwrap();
    project
        .command()
        .arg("--verify-only")
        .env("STUB_FREEZE_FILE", &freeze)
        .env("STUB_TK_EXIT", "1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing: beautifulsoup4"))
        .stderr(predicate::str::contains("import failed"))
        .stdout(predicate::str::contains("2 check(s) failed"));

    let calls = project.invocations();
    assert_eq!(count_matching(&calls, "-m pip install"), 1);
}

#[test]
fn test_verify_only_imports_declared_modules() {
    let project = TestProject::new();
    project.command().arg("--skip-installer").assert().success();

    let freeze = project.temp.path().join("freeze.txt");
    std::fs::write(&freeze, "openpyxl==3.1.2\nbeautifulsoup4==4.12.3\n").unwrap();
    project
        .command()
        .arg("--verify-only")
        .env("STUB_FREEZE_FILE", &freeze)
        .env("STUB_IMPORT_FAIL", "presentation.setup_wizard")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "import failed: smart_class_planner.presentation.setup_wizard",
        ))
        .stdout(predicate::str::contains("1 check(s) failed"));

    assert_eq!(
        count_matching(&project.invocations(), "import smart_class_planner."),
        3
    );
}

#[test]
fn test_misspelled_hidden_import_stops_before_bundling() {
    let project = TestProject::new();
    project.write_file(
        "bundle.toml",
        &common::BUNDLE_TOML.replace(
            "\"smart_class_planner.main\",",
            "\"smart_class_planner.main\",\n    \"smart_class_planner.domain.coarse\",",
        ),
    );

    project
        .command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bundle stage failed"))
        .stderr(predicate::str::contains("smart_class_planner.domain.coarse"));

    assert_eq!(count_matching(&project.invocations(), "PyInstaller"), 0);
}
