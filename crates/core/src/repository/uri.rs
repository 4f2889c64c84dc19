//! Connection URI parsing.
//!
//! `artifactory://<host>/<ignored-segment>/<container...>` becomes a base
//! endpoint `<http|https>://<host>/<ignored-segment>` and a container name.

use mlflow_artifactory_shared::Transport;
use reqwest::Url;

use super::error::{ArtifactError, ArtifactResult};

/// Scheme accepted by this repository.
pub const URI_SCHEME: &str = "artifactory";

const URI_EXAMPLE: &str = "artifactory://frogger.jfrog.io/artifactory/mlflow-local";

/// Base endpoint and container derived from a connection URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
    container: String,
}

impl Endpoint {
    /// Parse a connection URI, choosing the transport for the base endpoint.
    pub fn parse(uri: &str, transport: Transport) -> ArtifactResult<Self> {
        let parsed = Url::parse(uri).map_err(|_| invalid_uri(uri))?;
        if parsed.scheme() != URI_SCHEME {
            return Err(invalid_uri(uri));
        }

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid_uri(uri))?;
        let authority = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let segments: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            return Err(invalid_uri(uri));
        }

        Ok(Self {
            base: format!("{}://{authority}/{}", transport.scheme(), segments[0]),
            container: segments[1..].join("/"),
        })
    }

    /// Base endpoint, e.g. `https://frogger.jfrog.io/artifactory`.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Repository name, possibly followed by a sub-path.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }
}

fn invalid_uri(uri: &str) -> ArtifactError {
    ArtifactError::configuration(format!(
        "not a valid Artifactory URI: {uri}. Artifactory URI example: `{URI_EXAMPLE}`"
    ))
}
