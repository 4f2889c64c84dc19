//! Lazy traversal of a local directory for tree uploads.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A regular file found under the walked root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    /// Location on disk.
    pub local_path: PathBuf,
    /// Forward-slash path relative to the walked root, file name included.
    pub relative: String,
}

/// Depth-first, top-down walk yielding the files of each directory before
/// descending into its sub-directories, both in file-name order.
///
/// Directory symlinks are not followed. After the first error the walk
/// stops yielding.
#[derive(Debug)]
pub struct LocalTree {
    root: PathBuf,
    pending_dirs: Vec<PathBuf>,
    pending_files: VecDeque<PathBuf>,
}

impl LocalTree {
    /// Start a walk at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            pending_dirs: vec![root.clone()],
            root,
            pending_files: VecDeque::new(),
        }
    }

    fn expand(&mut self, dir: &Path) -> io::Result<()> {
        let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut sub_dirs = Vec::new();
        for entry in entries {
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                sub_dirs.push(path);
            } else if fs::metadata(&path).is_ok_and(|m| m.is_file()) {
                self.pending_files.push_back(path);
            } else {
                tracing::debug!(path = %path.display(), "skipping non-regular file");
            }
        }
        self.pending_dirs.extend(sub_dirs.into_iter().rev());
        Ok(())
    }

    fn tree_file(&self, local_path: PathBuf) -> io::Result<TreeFile> {
        let relative = local_path
            .strip_prefix(&self.root)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        Ok(TreeFile {
            relative: to_artifact_path(relative)?,
            local_path,
        })
    }

    fn fail(&mut self, err: io::Error) -> Option<io::Result<TreeFile>> {
        self.pending_dirs.clear();
        self.pending_files.clear();
        Some(Err(err))
    }
}

impl Iterator for LocalTree {
    type Item = io::Result<TreeFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(path) = self.pending_files.pop_front() {
                return match self.tree_file(path) {
                    Ok(file) => Some(Ok(file)),
                    Err(err) => self.fail(err),
                };
            }
            let dir = self.pending_dirs.pop()?;
            if let Err(err) = self.expand(&dir) {
                return self.fail(err);
            }
        }
    }
}

/// Convert a relative local path into a forward-slash artifact path.
pub fn to_artifact_path(relative: &Path) -> io::Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("non UTF-8 file name: {}", relative.display()),
                )
            })?),
            Component::CurDir => {}
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a relative path: {}", relative.display()),
                ));
            }
        }
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("rt-walk-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_walk_order_and_relative_paths() -> io::Result<()> {
        let root = scratch_dir();
        fs::create_dir_all(root.join("sub/deeper"))?;
        fs::create_dir_all(root.join("alpha"))?;
        fs::write(root.join("b.txt"), b"b")?;
        fs::write(root.join("a.txt"), b"a")?;
        fs::write(root.join("sub/c.txt"), b"c")?;
        fs::write(root.join("sub/deeper/d.txt"), b"d")?;
        fs::write(root.join("alpha/e.txt"), b"e")?;

        let relative = LocalTree::new(&root)
            .map(|f| f.map(|f| f.relative))
            .collect::<io::Result<Vec<_>>>()?;

        assert_eq!(
            relative,
            ["a.txt", "b.txt", "alpha/e.txt", "sub/c.txt", "sub/deeper/d.txt"]
        );

        fs::remove_dir_all(&root)?;
        Ok(())
    }

    #[test]
    fn test_empty_directory_yields_nothing() -> io::Result<()> {
        let root = scratch_dir();
        fs::create_dir_all(root.join("empty"))?;

        assert_eq!(LocalTree::new(&root).count(), 0);

        fs::remove_dir_all(&root)?;
        Ok(())
    }

    #[test]
    fn test_missing_root_errors_once() {
        let mut tree = LocalTree::new(scratch_dir());
        assert!(matches!(tree.next(), Some(Err(_))));
        assert!(tree.next().is_none());
    }

    #[test]
    fn test_to_artifact_path() -> io::Result<()> {
        assert_eq!(to_artifact_path(Path::new("sub/b.txt"))?, "sub/b.txt");
        assert_eq!(to_artifact_path(Path::new("./sub/b.txt"))?, "sub/b.txt");
        assert!(to_artifact_path(Path::new("../b.txt")).is_err());
        assert!(to_artifact_path(Path::new("/abs/b.txt")).is_err());
        Ok(())
    }
}
