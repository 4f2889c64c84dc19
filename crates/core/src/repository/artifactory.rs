//! Artifact repository backed by the JFrog Artifactory REST API.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use mlflow_artifactory_shared::{AdapterConfig, Credential};
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Body, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use super::artifact_repo::ArtifactRepository;
use super::error::{ArtifactError, ArtifactResult};
use super::listing::{FileInfo, FolderListing, ItemInfo};
use super::path::ArtifactPath;
use super::uri::Endpoint;
use super::urls::StoreUrls;
use super::walk::LocalTree;

/// User-Agent sent with every request.
pub const CLIENT_USER_AGENT: &str = concat!("mlflow-artifactory/", env!("CARGO_PKG_VERSION"));

/// Artifact repository for one Artifactory container.
///
/// Holds only immutable state, so one instance can serve concurrent
/// operations.
#[derive(Debug, Clone)]
pub struct ArtifactoryRepository {
    endpoint: Endpoint,
    urls: StoreUrls,
    headers: HeaderMap,
    skip_deletion: bool,
    client: Client,
}

impl ArtifactoryRepository {
    /// Create a repository for `artifactory://host/<segment>/<container...>`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed URI or a missing
    /// credential.
    pub fn new(uri: &str, config: &AdapterConfig) -> ArtifactResult<Self> {
        let client = Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .map_err(|e| ArtifactError::configuration(format!("cannot build HTTP client: {e}")))?;
        Self::with_client(uri, config, client)
    }

    /// Like [`ArtifactoryRepository::new`] with a caller-configured client,
    /// e.g. one carrying timeouts or proxies.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed URI or a missing
    /// credential.
    pub fn with_client(uri: &str, config: &AdapterConfig, client: Client) -> ArtifactResult<Self> {
        let endpoint = Endpoint::parse(uri, config.transport)?;
        let urls = StoreUrls::new(&endpoint)?;
        let headers = request_headers(config.credential.as_ref().map(Credential::expose))?;

        if config.skip_deletion {
            info!("deleting experiments or runs will not delete artifacts on Artifactory");
        } else {
            info!("deleting experiments or runs will delete artifacts on Artifactory");
        }
        debug!(
            base = %endpoint.base(),
            container = %endpoint.container(),
            "artifactory repository configured"
        );

        Ok(Self {
            endpoint,
            urls,
            headers,
            skip_deletion: config.skip_deletion,
            client,
        })
    }

    /// Base endpoint and container.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Whether subtree deletions are skipped.
    #[must_use]
    pub fn skips_deletion(&self) -> bool {
        self.skip_deletion
    }

    async fn upload(&self, local_file: &Path, target: &ArtifactPath) -> ArtifactResult<()> {
        let file = File::open(local_file).await?;
        let len = file.metadata().await?.len();
        let url = self.urls.object(target);
        debug!(local = %local_file.display(), url = %url, bytes = len, "uploading artifact");

        let response = self
            .client
            .put(url.clone())
            .headers(self.headers.clone())
            .header(CONTENT_LENGTH, len)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;

        ensure_success(&response, url, ArtifactError::store_write)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ArtifactResult<T> {
        let response = self
            .client
            .get(url.clone())
            .headers(self.headers.clone())
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(ArtifactError::store_read(response.status(), url));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ArtifactRepository for ArtifactoryRepository {
    async fn put_object(
        &self,
        local_file: &Path,
        artifact_path: Option<&str>,
    ) -> ArtifactResult<()> {
        let dest = ArtifactPath::from_option(artifact_path)?;
        let name = local_file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a file name: {}", local_file.display()),
                )
            })?;
        let target = dest.join(name)?;

        self.upload(local_file, &target).await?;
        info!(artifact = %target, "artifact uploaded");
        Ok(())
    }

    async fn put_tree(&self, local_dir: &Path, artifact_path: Option<&str>) -> ArtifactResult<()> {
        let dest = ArtifactPath::from_option(artifact_path)?;

        let mut uploaded = 0usize;
        for file in LocalTree::new(local_dir) {
            let file = file?;
            let target = dest.join(&file.relative)?;
            self.upload(&file.local_path, &target).await?;
            uploaded += 1;
        }

        info!(
            local_dir = %local_dir.display(),
            artifact_path = %dest,
            files = uploaded,
            "artifact tree uploaded"
        );
        Ok(())
    }

    async fn list_children(&self, path: Option<&str>) -> ArtifactResult<Vec<FileInfo>> {
        let path = ArtifactPath::from_option(path)?;

        let info: ItemInfo = self.get_json(self.urls.storage(&path)).await?;
        if !info.has_children() {
            debug!(path = %path, "no children in path");
            return Ok(Vec::new());
        }

        let listing: FolderListing = self.get_json(self.urls.folder_listing(&path)).await?;
        Ok(listing.into_entries(self.endpoint.container()))
    }

    async fn get_object(&self, remote_path: &str, local_path: &Path) -> ArtifactResult<()> {
        let remote = ArtifactPath::parse(remote_path)?;
        if remote.is_root() {
            return Err(ArtifactError::path_safety(remote_path, "an object path is required"));
        }
        let url = self.urls.object(&remote);
        debug!(url = %url, local = %local_path.display(), "downloading artifact");

        let mut response = self
            .client
            .get(url.clone())
            .headers(self.headers.clone())
            .send()
            .await?;
        ensure_success(&response, url, ArtifactError::store_read)?;

        let mut file = File::create(local_path).await?;
        if let Err(err) = copy_body(&mut response, &mut file).await {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(local_path).await {
                warn!(
                    local = %local_path.display(),
                    error = %cleanup,
                    "failed to remove partial download"
                );
            }
            return Err(err);
        }
        Ok(())
    }

    async fn delete_subtree(&self, path: Option<&str>) -> ArtifactResult<()> {
        if self.skip_deletion {
            info!(
                artifact_path = path.unwrap_or_default(),
                "artifact deletion skipped by configuration"
            );
            return Ok(());
        }

        let path = ArtifactPath::from_option(path)?;
        let url = self.urls.object(&path);
        info!(url = %url, "deleting artifacts");

        let response = self
            .client
            .delete(url.clone())
            .headers(self.headers.clone())
            .send()
            .await?;
        ensure_success(&response, url, ArtifactError::store_write)
    }
}

/// `Authorization` and `User-Agent` for every request; the token value is
/// marked sensitive so it never shows up in debug output.
fn request_headers(credential: Option<&str>) -> ArtifactResult<HeaderMap> {
    let token = credential.filter(|t| !t.is_empty()).ok_or_else(|| {
        ArtifactError::configuration(
            "no Artifactory token provided through ARTIFACTORY_AUTH_TOKEN",
        )
    })?;

    let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        ArtifactError::configuration("Artifactory token is not a valid header value")
    })?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    Ok(headers)
}

fn ensure_success<F>(response: &Response, url: Url, to_error: F) -> ArtifactResult<()>
where
    F: FnOnce(StatusCode, Url) -> ArtifactError,
{
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(to_error(status, url))
    }
}

async fn copy_body(response: &mut Response, file: &mut File) -> ArtifactResult<()> {
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlflow_artifactory_shared::Transport;

    const URI: &str = "artifactory://frogger.jfrog.io/artifactory/mlflow-local";

    #[test]
    fn test_new_requires_credential() {
        let err = ArtifactoryRepository::new(URI, &AdapterConfig::default()).unwrap_err();
        assert!(matches!(err, ArtifactError::Configuration(_)));

        let err = ArtifactoryRepository::new(URI, &AdapterConfig::new("")).unwrap_err();
        assert!(matches!(err, ArtifactError::Configuration(_)));
    }

    #[test]
    fn test_new_rejects_bad_uri() {
        let err =
            ArtifactoryRepository::new("artifactory://host/only", &AdapterConfig::new("t"))
                .unwrap_err();
        assert!(matches!(err, ArtifactError::Configuration(_)));
    }

    #[test]
    fn test_new_rejects_unprintable_token() {
        let err = ArtifactoryRepository::new(URI, &AdapterConfig::new("bad\ntoken")).unwrap_err();
        assert!(matches!(err, ArtifactError::Configuration(_)));
    }

    #[test]
    fn test_endpoint_follows_transport() {
        let config = AdapterConfig::new("t").with_transport(Transport::Plain);
        let repo = ArtifactoryRepository::new(URI, &config).expect("valid");
        assert_eq!(repo.endpoint().base(), "http://frogger.jfrog.io/artifactory");
        assert_eq!(repo.endpoint().container(), "mlflow-local");
        assert!(!repo.skips_deletion());
    }

    #[test]
    fn test_headers_hide_token() {
        let headers = request_headers(Some("top-secret")).expect("valid");
        assert_eq!(
            headers.get(AUTHORIZATION).map(HeaderValue::is_sensitive),
            Some(true)
        );
        assert_eq!(
            headers.get(USER_AGENT).and_then(|v| v.to_str().ok()),
            Some(CLIENT_USER_AGENT)
        );

        let repo = ArtifactoryRepository::new(URI, &AdapterConfig::new("top-secret"))
            .expect("valid");
        assert!(!format!("{repo:?}").contains("top-secret"));
    }

    #[test]
    fn test_user_agent_names_adapter_and_version() {
        assert!(CLIENT_USER_AGENT.starts_with("mlflow-artifactory/"));
        assert!(CLIENT_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
