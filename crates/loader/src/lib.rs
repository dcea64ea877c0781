//! Discovers Java sources, reads them, and persists library component
//! trees used to pre-seed an analysis.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

mod library;
mod walk;
pub use library::{load_libraries, load_library, save_library};
pub use walk::collect_sources;

#[derive(Debug, Clone)]
/// Source text of one file.
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

pub fn read_source(path: &Path) -> anyhow::Result<SourceFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(SourceFile {
        path: path.to_path_buf(),
        content,
    })
}

/// Digest identifying one analyzed revision of a file set. Independent of
/// the order the files are given in.
///
/// # Example
/// ```
/// use loader::{revision_id, SourceFile};
/// let a = SourceFile { path: "A.java".into(), content: "class A {}".into() };
/// let b = SourceFile { path: "B.java".into(), content: "class B {}".into() };
/// assert_eq!(revision_id(&[a.clone(), b.clone()]), revision_id(&[b, a]));
/// ```
pub fn revision_id(files: &[SourceFile]) -> String {
    let mut sorted: Vec<&SourceFile> = files.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));
    let mut hasher = blake3::Hasher::new();
    for f in sorted {
        hasher.update(f.path.to_string_lossy().as_bytes());
        hasher.update(&[0]);
        hasher.update(f.content.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests;
