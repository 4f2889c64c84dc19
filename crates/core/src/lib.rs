//! Artifact storage for MLflow on JFrog Artifactory.
//!
//! This crate implements the artifact repository the tracker loads for
//! `artifactory://` URIs. Plugin registration lives outside; this crate only
//! provides the [`ArtifactRepository`] capability and its Artifactory
//! implementation.
//!
//! # Modules
//!
//! - `repository` - URI parsing, path safety, listing and transfer operations

pub mod repository;

pub use mlflow_artifactory_shared::{AdapterConfig, Credential, Transport};
pub use repository::{
    ArtifactError, ArtifactRepository, ArtifactResult, ArtifactoryRepository, FileInfo,
};
