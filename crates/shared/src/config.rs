//! Adapter configuration management.
//!
//! Settings come from `ARTIFACTORY_*` environment variables (optionally
//! layered over a `config/artifactory` file) and are frozen into an
//! [`AdapterConfig`] before the repository is constructed.

use std::fmt;

use serde::Deserialize;

/// Prefix shared by every environment variable the adapter reads.
pub const ENV_PREFIX: &str = "ARTIFACTORY";

/// Transport used to reach the Artifactory base endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Plain HTTP.
    Plain,
    /// HTTPS.
    #[default]
    Secure,
}

impl Transport {
    /// URL scheme for this transport.
    #[must_use]
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Plain => "http",
            Self::Secure => "https",
        }
    }
}

/// Bearer token for the Artifactory REST API.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Adapter configuration.
///
/// The credential is optional here so that a missing token surfaces as a
/// construction error of the repository rather than a load error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Plain or secure transport for the base endpoint.
    pub transport: Transport,
    /// Bearer token sent with every request.
    pub credential: Option<Credential>,
    /// When set, subtree deletions never reach the store.
    pub skip_deletion: bool,
    /// Raises log verbosity only.
    pub verbose: bool,
}

impl AdapterConfig {
    /// Create a secure configuration with the given bearer credential.
    #[must_use]
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(Credential::new(credential)),
            ..Self::default()
        }
    }

    /// Set the transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Enable or disable the deletion skip.
    #[must_use]
    pub fn with_skip_deletion(mut self, skip: bool) -> Self {
        self.skip_deletion = skip;
        self
    }

    /// Enable or disable verbose diagnostics.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Loads configuration from an optional `config/artifactory` file and
    /// `ARTIFACTORY_*` environment variables, the latter taking precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings: RawSettings = config::Config::builder()
            .add_source(config::File::with_name("config/artifactory").required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        Ok(settings.into())
    }
}

/// Raw string settings, interpreted the way the tracker plugin always has:
/// `NO_SSL` is case-insensitive, the other flags only match a literal `true`.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    no_ssl: Option<String>,
    auth_token: Option<String>,
    artifacts_delete_skip: Option<String>,
    debug: Option<String>,
}

impl From<RawSettings> for AdapterConfig {
    fn from(raw: RawSettings) -> Self {
        let transport = if raw
            .no_ssl
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            Transport::Plain
        } else {
            Transport::Secure
        };

        Self {
            transport,
            credential: raw.auth_token.map(Credential::new),
            skip_deletion: raw.artifacts_delete_skip.as_deref() == Some("true"),
            verbose: raw.debug.as_deref() == Some("true"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "ARTIFACTORY_NO_SSL",
        "ARTIFACTORY_AUTH_TOKEN",
        "ARTIFACTORY_ARTIFACTS_DELETE_SKIP",
        "ARTIFACTORY_DEBUG",
    ];

    fn with_env<R>(set: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let vars: Vec<(&str, Option<&str>)> = VARS
            .iter()
            .map(|name| {
                let value = set.iter().find(|(k, _)| k == name).map(|(_, v)| *v);
                (*name, value)
            })
            .collect();
        temp_env::with_vars(vars, f)
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = with_env(&[], AdapterConfig::load).expect("should load");
        assert_eq!(config.transport, Transport::Secure);
        assert_eq!(config.credential, None);
        assert!(!config.skip_deletion);
        assert!(!config.verbose);
    }

    #[test]
    fn test_full_environment() {
        let config = with_env(
            &[
                ("ARTIFACTORY_NO_SSL", "true"),
                ("ARTIFACTORY_AUTH_TOKEN", "secret-token"),
                ("ARTIFACTORY_ARTIFACTS_DELETE_SKIP", "true"),
                ("ARTIFACTORY_DEBUG", "true"),
            ],
            AdapterConfig::load,
        )
        .expect("should load");

        assert_eq!(config.transport, Transport::Plain);
        assert_eq!(config.credential.as_ref().map(Credential::expose), Some("secret-token"));
        assert!(config.skip_deletion);
        assert!(config.verbose);
    }

    #[rstest]
    #[case("true", Transport::Plain)]
    #[case("TRUE", Transport::Plain)]
    #[case("false", Transport::Secure)]
    #[case("1", Transport::Secure)]
    fn test_no_ssl_parsing(#[case] value: &str, #[case] expected: Transport) {
        let config =
            with_env(&[("ARTIFACTORY_NO_SSL", value)], AdapterConfig::load).expect("should load");
        assert_eq!(config.transport, expected);
    }

    #[rstest]
    #[case("true", true)]
    #[case("True", false)]
    #[case("false", false)]
    #[case("yes", false)]
    fn test_delete_skip_only_literal_true(#[case] value: &str, #[case] expected: bool) {
        let config = with_env(
            &[("ARTIFACTORY_ARTIFACTS_DELETE_SKIP", value)],
            AdapterConfig::load,
        )
        .expect("should load");
        assert_eq!(config.skip_deletion, expected);
    }

    #[test]
    fn test_transport_scheme() {
        assert_eq!(Transport::Plain.scheme(), "http");
        assert_eq!(Transport::Secure.scheme(), "https");
        assert_eq!(Transport::default(), Transport::Secure);
    }

    #[test]
    fn test_builder() {
        let config = AdapterConfig::new("tok")
            .with_transport(Transport::Plain)
            .with_skip_deletion(true)
            .with_verbose(true);
        assert_eq!(config.credential.as_ref().map(Credential::expose), Some("tok"));
        assert_eq!(config.transport, Transport::Plain);
        assert!(config.skip_deletion);
        assert!(config.verbose);
    }

    #[test]
    fn test_debug_redacts_credential() {
        let rendered = format!("{:?}", AdapterConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));

        let credential = Credential::new("super-secret");
        assert_eq!(format!("{credential:?}"), "Credential(<redacted>)");
        assert_eq!(credential.expose(), "super-secret");
        assert!(Credential::new("").is_empty());
    }
}
