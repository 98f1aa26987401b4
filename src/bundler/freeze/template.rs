//! PyInstaller spec template.
//!
//! Every placeholder receives a ready-made Python literal; the template does
//! no quoting of its own.

/// One-folder layout: Analysis, PYZ, EXE (without binaries), COLLECT.
pub const SPEC_TEMPLATE: &str = r#"# -*- mode: python ; coding: utf-8 -*-
# Generated by planner_bundler for {{name}}. Edit bundle.toml instead;
# this file is rewritten on every build.

a = Analysis(
    [{{entry_point}}],
    pathex={{pathex}},
    binaries=[],
    datas={{datas}},
    hiddenimports={{hidden_imports}},
    hookspath=[],
    hooksconfig={},
    runtime_hooks=[],
    excludes={{excludes}},
    noarchive=False,
    optimize=0,
)
pyz = PYZ(a.pure)

exe = EXE(
    pyz,
    a.scripts,
    [],
    exclude_binaries=True,
    name={{name_literal}},
    debug=False,
    bootloader_ignore_signals=False,
    strip=False,
    upx={{upx}},
    console={{console}},
    disable_windowed_traceback=False,
    argv_emulation=False,
    target_arch=None,
    codesign_identity=None,
    entitlements_file=None,
    icon={{icon}},
)
coll = COLLECT(
    exe,
    a.binaries,
    a.datas,
    strip=False,
    upx={{upx}},
    upx_exclude=[],
    name={{name_literal}},
)
"#;
