//! Directory listings reconstructed from the Artifactory storage API.

use serde::{Deserialize, Serialize};

/// One node of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Container-root-relative path.
    pub path: String,
    /// Whether the node is a directory.
    pub is_dir: bool,
    /// Size in bytes, `None` for directories.
    pub file_size: Option<u64>,
}

impl FileInfo {
    /// A file entry.
    #[must_use]
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            file_size: Some(size),
        }
    }

    /// A directory entry.
    #[must_use]
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            file_size: None,
        }
    }
}

/// `GET /api/storage/{container}/{path}` response, reduced to what we use.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ItemInfo {
    #[serde(default)]
    pub children: Vec<serde_json::Value>,
}

impl ItemInfo {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// `GET /api/storage/{container}/{path}?list&...` response.
#[derive(Debug, Deserialize)]
pub(crate) struct FolderListing {
    pub uri: String,
    #[serde(default)]
    pub files: Vec<ListedFile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListedFile {
    pub uri: String,
    #[serde(default)]
    pub folder: bool,
    #[serde(default)]
    pub size: Option<i64>,
}

impl FolderListing {
    /// Turn the flat listing into container-root-relative entries, keeping
    /// the order the store returned.
    pub fn into_entries(self, container: &str) -> Vec<FileInfo> {
        let parent = parent_dir(&self.uri, container);
        self.files
            .into_iter()
            .map(|file| {
                let name = file.uri.trim_start_matches('/');
                let path = match parent {
                    Some(parent) => format!("{parent}/{name}"),
                    None => name.to_string(),
                };
                if file.folder {
                    FileInfo::dir(path)
                } else {
                    FileInfo {
                        path,
                        is_dir: false,
                        file_size: file.size.and_then(|s| u64::try_from(s).ok()),
                    }
                }
            })
            .collect()
    }
}

/// Directory the listing was taken from, relative to the container root.
///
/// The echoed URI looks like `.../api/storage/{container}/{dir}`; the
/// storage marker is preferred so a container name that also appears in
/// the base path does not confuse the lookup.
fn parent_dir<'a>(echoed_uri: &'a str, container: &str) -> Option<&'a str> {
    let storage_root = format!("api/storage/{container}");
    let echoed_uri = echoed_uri.trim_end_matches('/');
    if echoed_uri.ends_with(storage_root.as_str()) {
        return None;
    }
    let storage_marker = format!("{storage_root}/");
    let rest = echoed_uri
        .split_once(storage_marker.as_str())
        .or_else(|| echoed_uri.split_once(format!("{container}/").as_str()))
        .map(|(_, rest)| rest)?;
    let rest = rest.trim_matches('/');
    (!rest.is_empty()).then_some(rest)
}
