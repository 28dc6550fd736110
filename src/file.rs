use log::trace;
use std::io::Result;
use std::path::{Component, Path, PathBuf};

/// Lexically cleans a path: drops `.` segments and folds `..` into the preceding
/// segment. `..` directly under the root is dropped. The filesystem is never consulted.
pub fn clean<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Makes `path` absolute against `cwd` (when it isn't already) and cleans it.
pub fn absolute<P: AsRef<Path>>(path: P, cwd: &Path) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        clean(path)
    } else {
        clean(cwd.join(path))
    }
}

/// Joins `relative` onto `root`, returning `None` when the result would land outside
/// `root`. `root` is expected to be absolute and clean already.
pub fn join_within<P: AsRef<Path>>(root: &Path, relative: P) -> Option<PathBuf> {
    let relative = relative.as_ref();
    if relative.has_root() {
        return None;
    }
    let joined = clean(root.join(relative));
    if joined.starts_with(root) && joined != root {
        Some(joined)
    } else {
        None
    }
}

pub trait FileOps {
    /// Removes the file when `commit` is set. Otherwise only traces what would happen.
    async fn remove_file(&self, commit: bool) -> Result<()>;
}

impl<P> FileOps for P
where
    P: AsRef<Path> + ?Sized,
{
    async fn remove_file(&self, commit: bool) -> Result<()> {
        let path = self.as_ref();
        if commit {
            trace!("unlinking {}", path.display());
            tokio::fs::remove_file(path).await
        } else {
            trace!("dry run, leaving {}", path.display());
            Ok(())
        }
    }
}
