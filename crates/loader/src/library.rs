use anyhow::{bail, Context};
use ir::Library;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Reads a library component tree persisted as JSON.
pub fn load_library(path: &Path) -> anyhow::Result<Library> {
    let started = Instant::now();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read library: {}", path.display()))?;
    let library: Library = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse library: {}", path.display()))?;
    if !library.components.is_consistent() {
        bail!("Library {} has a malformed component tree", path.display());
    }
    debug!(
        library = %library.coordinates(),
        file = %path.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Library read"
    );
    Ok(library)
}

/// Loads every library in order, failing on the first unreadable one.
pub fn load_libraries(paths: &[PathBuf]) -> anyhow::Result<Vec<Library>> {
    paths.iter().map(|p| load_library(p)).collect()
}

pub fn save_library(library: &Library, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(library).context("Failed to serialize library")?;
    fs::write(path, json).with_context(|| format!("Failed to write library: {}", path.display()))?;
    Ok(())
}
