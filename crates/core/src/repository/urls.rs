//! REST endpoint composition.

use reqwest::Url;

use super::error::{ArtifactError, ArtifactResult};
use super::path::ArtifactPath;
use super::uri::Endpoint;

/// Query selecting a flat, one-level listing that includes folders.
pub const FOLDER_LISTING_QUERY: &str = "list&deep=0&depth=1&listFolders=1";

/// Builds request URLs for one container.
///
/// Container segments keep the encoding of the connection URI; artifact
/// path segments are percent-encoded here.
#[derive(Debug, Clone)]
pub struct StoreUrls {
    object_root: Url,
    storage_root: Url,
}

impl StoreUrls {
    /// Create URL builders for the endpoint's container.
    pub fn new(endpoint: &Endpoint) -> ArtifactResult<Self> {
        let object_root = parse_root(&format!("{}/{}", endpoint.base(), endpoint.container()))?;
        let storage_root = parse_root(&format!(
            "{}/api/storage/{}",
            endpoint.base(),
            endpoint.container()
        ))?;
        Ok(Self {
            object_root,
            storage_root,
        })
    }

    /// `{base}/{container}[/path]` - object read, write and delete.
    #[must_use]
    pub fn object(&self, path: &ArtifactPath) -> Url {
        append(&self.object_root, path)
    }

    /// `{base}/api/storage/{container}[/path]` - item metadata.
    #[must_use]
    pub fn storage(&self, path: &ArtifactPath) -> Url {
        append(&self.storage_root, path)
    }

    /// Item metadata with the flat folder listing query.
    #[must_use]
    pub fn folder_listing(&self, path: &ArtifactPath) -> Url {
        let mut url = self.storage(path);
        url.set_query(Some(FOLDER_LISTING_QUERY));
        url
    }
}

fn parse_root(raw: &str) -> ArtifactResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| ArtifactError::configuration(format!("invalid endpoint {raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ArtifactError::configuration(format!(
            "endpoint {raw} cannot carry a path"
        )));
    }
    Ok(url)
}

fn append(root: &Url, path: &ArtifactPath) -> Url {
    let mut url = root.clone();
    if !path.is_root()
        && let Ok(mut segments) = url.path_segments_mut()
    {
        segments.pop_if_empty().extend(path.segments());
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlflow_artifactory_shared::Transport;

    fn urls(uri: &str) -> StoreUrls {
        let endpoint = Endpoint::parse(uri, Transport::Plain).expect("valid uri");
        StoreUrls::new(&endpoint).expect("valid endpoint")
    }

    #[test]
    fn test_object_urls() {
        let urls = urls("artifactory://localhost:8082/artifactory/test-server/subpath");
        assert_eq!(
            urls.object(&ArtifactPath::root()).as_str(),
            "http://localhost:8082/artifactory/test-server/subpath"
        );
        assert_eq!(
            urls.object(&ArtifactPath::parse("dir/b.txt").expect("valid")).as_str(),
            "http://localhost:8082/artifactory/test-server/subpath/dir/b.txt"
        );
    }

    #[test]
    fn test_storage_urls() {
        let urls = urls("artifactory://rt.local/artifactory/repo");
        assert_eq!(
            urls.storage(&ArtifactPath::root()).as_str(),
            "http://rt.local/artifactory/api/storage/repo"
        );
        assert_eq!(
            urls.folder_listing(&ArtifactPath::parse("dir").expect("valid")).as_str(),
            "http://rt.local/artifactory/api/storage/repo/dir?list&deep=0&depth=1&listFolders=1"
        );
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let urls = urls("artifactory://rt.local/artifactory/repo");
        let path = ArtifactPath::parse("my dir/a#b?.txt").expect("valid");
        assert_eq!(
            urls.object(&path).as_str(),
            "http://rt.local/artifactory/repo/my%20dir/a%23b%3F.txt"
        );
    }
}
