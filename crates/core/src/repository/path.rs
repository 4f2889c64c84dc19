//! Container-relative artifact paths.

use std::fmt;

use super::error::{ArtifactError, ArtifactResult};

/// A validated, normalized, forward-slash path inside the container.
///
/// The empty path is the container root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArtifactPath(String);

impl ArtifactPath {
    /// The container root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Validate a path that must not escape the container.
    ///
    /// Only already-normalized relative paths are accepted: no leading
    /// slash or `..` prefix, no `.`, `..` or empty segments, no trailing
    /// slash, no backslash.
    pub fn parse(path: &str) -> ArtifactResult<Self> {
        if path.is_empty() {
            return Ok(Self::root());
        }
        if path.contains('\0') {
            return Err(ArtifactError::path_safety(path, "contains a NUL byte"));
        }
        if path.contains('\\') {
            return Err(ArtifactError::path_safety(path, "contains a backslash"));
        }
        if path.starts_with('/') {
            return Err(ArtifactError::path_safety(path, "must be relative"));
        }
        if path.starts_with("..") {
            return Err(ArtifactError::path_safety(
                path,
                "parent directory traversal is not allowed",
            ));
        }
        for segment in path.split('/') {
            match segment {
                ".." => {
                    return Err(ArtifactError::path_safety(
                        path,
                        "parent directory traversal is not allowed",
                    ));
                }
                "" | "." => {
                    return Err(ArtifactError::path_safety(path, "path is not normalized"));
                }
                _ => {}
            }
        }
        Ok(Self(path.to_string()))
    }

    /// Validate an optional path; `None` and `""` both mean the root.
    pub fn from_option(path: Option<&str>) -> ArtifactResult<Self> {
        path.map_or_else(|| Ok(Self::root()), Self::parse)
    }

    /// Append a child path, validating the result.
    pub fn join(&self, child: &str) -> ArtifactResult<Self> {
        if self.is_root() {
            Self::parse(child)
        } else if child.is_empty() {
            Ok(self.clone())
        } else {
            Self::parse(&format!("{}/{child}", self.0))
        }
    }

    /// Whether this is the container root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path as a string slice, empty for the root.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Individual path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Last segment, `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }
}

impl fmt::Display for ArtifactPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
