//! Converters of source files into the declaration model consumed by the
//! symbol-table engine.

use anyhow::{Context, Result};
use ir::CompilationUnit;
use serde::Serialize;
use std::{fs, path::Path};
use tracing::debug;

pub mod languages;
pub use languages::*;

#[derive(Debug, Default, Clone, Serialize)]
pub struct ParserMetrics {
    pub files_parsed: usize,
    /// Files that needed the tolerant retry.
    pub retried: usize,
    pub parse_errors: usize,
}

impl ParserMetrics {
    /// Accounts for one parse attempt.
    pub fn record<T>(&mut self, outcome: &Result<(T, ParseStrategy)>) {
        match outcome {
            Ok((_, strategy)) => {
                self.files_parsed += 1;
                if *strategy == ParseStrategy::Tolerant {
                    self.retried += 1;
                }
            }
            Err(_) => self.parse_errors += 1,
        }
    }
}

/// Determines the supported file type from the extension.
///
/// # Example
/// ```
/// use parsers::detect_type;
/// assert_eq!(detect_type(std::path::Path::new("src/A.java")), Some("java"));
/// assert_eq!(detect_type(std::path::Path::new("README.md")), None);
/// ```
pub fn detect_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase());
    let detected = match ext.as_deref() {
        Some("java") => Some("java"),
        _ => None,
    };
    if let Some(t) = detected {
        debug!(file = %path.display(), file_type = t, "File type detected");
    } else {
        debug!(file = %path.display(), "Unsupported file type");
    }
    detected
}

/// Reads a file and lowers it, retrying with the tolerant strategy on
/// syntax errors.
///
/// # Example
/// ```
/// use parsers::parse_file;
/// use std::fs;
/// let path = std::env::temp_dir().join("Ex.java");
/// fs::write(&path, "package ex; public class Ex {}").unwrap();
/// let unit = parse_file(&path, None).unwrap();
/// assert_eq!(unit.package.unwrap().segments, vec!["ex"]);
/// ```
pub fn parse_file(path: &Path, metrics: Option<&mut ParserMetrics>) -> Result<CompilationUnit> {
    debug!(file = %path.display(), "Parsing file");
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let outcome = parse_java_with_fallback(&content, &path.to_string_lossy());
    if let Some(m) = metrics {
        m.record(&outcome);
    }
    outcome.map(|(unit, _)| unit)
}
