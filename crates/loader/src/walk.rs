use std::collections::{HashSet, VecDeque};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Turns a permission error into `None` so the walk can carry on.
fn allow_denied<T>(res: io::Result<T>, path: &Path) -> anyhow::Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!(path = %path.display(), "Permission denied");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn metadata(path: &Path) -> anyhow::Result<Option<Metadata>> {
    allow_denied(fs::symlink_metadata(path), path)
}

/// Collects every regular file below `root` that `accept` keeps and
/// `excludes` does not reject. Symlinks are never followed. The result is
/// sorted so runs over the same tree see files in the same order.
pub fn collect_sources<E, A>(root: &Path, excludes: &E, accept: &A) -> anyhow::Result<Vec<PathBuf>>
where
    E: Fn(&Path) -> bool,
    A: Fn(&Path) -> bool,
{
    let mut found = Vec::new();
    let mut pending: VecDeque<PathBuf> = VecDeque::from([root.to_path_buf()]);
    let mut seen: HashSet<PathBuf> = HashSet::new();

    while let Some(current) = pending.pop_front() {
        if !seen.insert(current.clone()) {
            continue;
        }
        if excludes(&current) {
            debug!(path = %current.display(), "Path excluded");
            continue;
        }
        let Some(meta) = metadata(&current)? else {
            continue;
        };
        let kind = meta.file_type();
        if kind.is_symlink() {
            debug!(path = %current.display(), "Symlink skipped");
        } else if kind.is_file() {
            if accept(&current) {
                debug!(path = %current.display(), "Source discovered");
                found.push(current);
            }
        } else if kind.is_dir() {
            let Some(entries) = allow_denied(fs::read_dir(&current), &current)? else {
                continue;
            };
            for entry in entries {
                if let Some(entry) = allow_denied(entry, &current)? {
                    pending.push_back(entry.path());
                }
            }
        }
    }

    found.sort();
    Ok(found)
}
