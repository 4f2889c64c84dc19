//! Capability interface exposed to the hosting tracker.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::{ArtifactError, ArtifactResult};
use super::listing::FileInfo;
use super::path::ArtifactPath;

/// Artifact store operations the tracker relies on.
///
/// Every operation completes or fails before returning; nothing is retried
/// and the first failure aborts multi-file operations.
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Upload one local file to `[artifact_path/]<file name>`.
    async fn put_object(
        &self,
        local_file: &Path,
        artifact_path: Option<&str>,
    ) -> ArtifactResult<()>;

    /// Upload every file under `local_dir`, preserving its layout below
    /// `artifact_path`. Not transactional.
    async fn put_tree(&self, local_dir: &Path, artifact_path: Option<&str>) -> ArtifactResult<()>;

    /// Immediate children of `path` (the root when `None`).
    async fn list_children(&self, path: Option<&str>) -> ArtifactResult<Vec<FileInfo>>;

    /// Download one object into `local_path`, overwriting it.
    async fn get_object(&self, remote_path: &str, local_path: &Path) -> ArtifactResult<()>;

    /// Delete everything under `path` (the whole container when `None`).
    async fn delete_subtree(&self, path: Option<&str>) -> ArtifactResult<()>;

    /// Download a directory or a single file below `local_dir`.
    ///
    /// A path that lists no children is treated as a file. Returns the local
    /// path that was written.
    async fn get_tree(&self, path: Option<&str>, local_dir: &Path) -> ArtifactResult<PathBuf> {
        let root = ArtifactPath::from_option(path)?;
        let entries = self.list_children(Some(root.as_str())).await?;

        if entries.is_empty()
            && let Some(name) = root.file_name()
        {
            tokio::fs::create_dir_all(local_dir).await?;
            let target = local_dir.join(name);
            self.get_object(root.as_str(), &target).await?;
            return Ok(target);
        }

        let target = root
            .file_name()
            .map_or_else(|| local_dir.to_path_buf(), |name| local_dir.join(name));
        tokio::fs::create_dir_all(&target).await?;

        let mut pending = vec![entries];
        while let Some(entries) = pending.pop() {
            for entry in entries {
                let remote = ArtifactPath::parse(&entry.path)?;
                let local = target.join(relative_to(&root, &remote)?);
                if entry.is_dir {
                    tokio::fs::create_dir_all(&local).await?;
                    pending.push(self.list_children(Some(remote.as_str())).await?);
                } else {
                    self.get_object(remote.as_str(), &local).await?;
                }
            }
        }
        Ok(target)
    }
}

/// Part of `path` below `root`; listings only ever return descendants.
fn relative_to<'a>(root: &ArtifactPath, path: &'a ArtifactPath) -> ArtifactResult<&'a str> {
    if root.is_root() {
        return Ok(path.as_str());
    }
    path.as_str()
        .strip_prefix(root.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| {
            ArtifactError::path_safety(
                path.as_str(),
                "listing entry outside the requested directory",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to() {
        let root = ArtifactPath::parse("dir").expect("valid");
        let child = ArtifactPath::parse("dir/sub/b.txt").expect("valid");
        assert_eq!(relative_to(&root, &child).expect("descendant"), "sub/b.txt");
        assert_eq!(
            relative_to(&ArtifactPath::root(), &child).expect("descendant"),
            "dir/sub/b.txt"
        );

        let sibling = ArtifactPath::parse("dirx/b.txt").expect("valid");
        assert!(relative_to(&root, &sibling).is_err());
    }
}
