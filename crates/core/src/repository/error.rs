//! Artifact repository error types.

use thiserror::Error;

/// Result type alias using `ArtifactError`.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Artifact repository errors.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Invalid connection URI or missing credential.
    #[error("artifactory configuration error: {0}")]
    Configuration(String),

    /// Artifact path would escape the container.
    #[error("invalid artifact path '{path}': {reason}")]
    PathSafety {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// PUT or DELETE answered with a non-success status.
    #[error("artifactory write failed: {status} {reason} ({url})")]
    StoreWrite {
        /// HTTP status code.
        status: u16,
        /// HTTP reason phrase.
        reason: String,
        /// Request URL.
        url: String,
    },

    /// GET answered with a non-success status.
    #[error("artifactory read failed: {status} {reason} ({url})")]
    StoreRead {
        /// HTTP status code.
        status: u16,
        /// HTTP reason phrase.
        reason: String,
        /// Request URL.
        url: String,
    },

    /// Network-level failure.
    #[error("artifactory transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Listing response was not the expected JSON.
    #[error("malformed artifactory response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local filesystem failure.
    #[error("local file error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArtifactError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a path safety error.
    #[must_use]
    pub fn path_safety(path: impl Into<String>, reason: &'static str) -> Self {
        Self::PathSafety {
            path: path.into(),
            reason,
        }
    }

    /// Create a store write error from a response status.
    #[must_use]
    pub fn store_write(status: reqwest::StatusCode, url: impl Into<String>) -> Self {
        Self::StoreWrite {
            status: status.as_u16(),
            reason: reason_phrase(status),
            url: url.into(),
        }
    }

    /// Create a store read error from a response status.
    #[must_use]
    pub fn store_read(status: reqwest::StatusCode, url: impl Into<String>) -> Self {
        Self::StoreRead {
            status: status.as_u16(),
            reason: reason_phrase(status),
            url: url.into(),
        }
    }

    /// HTTP status carried by store errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::StoreWrite { status, .. } | Self::StoreRead { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this is a failed observing call.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::StoreRead { .. })
    }

    /// Whether this is a failed mutating call.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::StoreWrite { .. })
    }

    /// Returns the error code reported to the hosting tracker.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::PathSafety { .. } => "INVALID_ARTIFACT_PATH",
            Self::StoreWrite { .. } => "STORE_WRITE_ERROR",
            Self::StoreRead { .. } => "STORE_READ_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

fn reason_phrase(status: reqwest::StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_store_errors_carry_status_and_reason() {
        let err = ArtifactError::store_write(StatusCode::FORBIDDEN, "http://rt/a");
        assert!(err.is_write());
        assert!(!err.is_read());
        assert_eq!(err.status(), Some(403));
        assert_eq!(
            err.to_string(),
            "artifactory write failed: 403 Forbidden (http://rt/a)"
        );

        let err = ArtifactError::store_read(StatusCode::NOT_FOUND, "http://rt/b");
        assert!(err.is_read());
        assert!(!err.is_write());
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "artifactory read failed: 404 Not Found (http://rt/b)"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ArtifactError::configuration("x").error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            ArtifactError::path_safety("../x", "traversal").error_code(),
            "INVALID_ARTIFACT_PATH"
        );
        assert_eq!(
            ArtifactError::store_write(StatusCode::BAD_GATEWAY, "u").error_code(),
            "STORE_WRITE_ERROR"
        );
        assert_eq!(
            ArtifactError::store_read(StatusCode::BAD_GATEWAY, "u").error_code(),
            "STORE_READ_ERROR"
        );
        assert_eq!(
            ArtifactError::from(std::io::Error::other("disk")).error_code(),
            "IO_ERROR"
        );
    }

    #[test]
    fn test_non_store_errors_have_no_status() {
        assert_eq!(ArtifactError::configuration("x").status(), None);
        assert_eq!(ArtifactError::path_safety("/x", "absolute").status(), None);
    }
}
