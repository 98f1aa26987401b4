//! Dependency manifest (`requirements.txt`) parsing.

use crate::bundler::error::{ErrorExt, Result};
use regex::Regex;
use std::path::Path;

/// One requirement line.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Requirement {
    /// Distribution name as written.
    pub name: String,
    /// Everything after the name (extras, version specifiers, markers).
    pub spec: String,
}

impl Requirement {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// PEP 503 name normalization: lowercase, runs of `-`, `_`, `.` become `-`.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    normalized
}

/// Parses requirement lines, skipping blanks, comments and pip options.
pub fn parse_requirements(text: &str) -> Result<Vec<Requirement>> {
    let name_pattern = Regex::new(r"^([A-Za-z0-9][A-Za-z0-9_.\-]*)")?;

    let mut requirements = Vec::new();
    for raw in text.lines() {
        let line = match raw.find(" #") {
            Some(idx) => &raw[..idx],
            None => raw,
        }
        .trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }

        match name_pattern.find(line) {
            Some(found) => requirements.push(Requirement {
                name: found.as_str().to_string(),
                spec: line[found.end()..].trim().to_string(),
            }),
            None => log::warn!("Skipping unrecognized requirement line: {}", line),
        }
    }

    Ok(requirements)
}

/// Reads and parses the dependency manifest.
pub async fn load_requirements(path: &Path) -> Result<Vec<Requirement>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .fs_context("reading dependency manifest", path)?;
    parse_requirements(&text)
}
