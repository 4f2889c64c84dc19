//! Shared configuration for the MLflow Artifactory artifact repository.
//!
//! This crate owns the settings that the hosting tracker normally feeds
//! through environment variables:
//! - Transport selection (plain HTTP vs HTTPS)
//! - Bearer credential
//! - Deletion-skip policy
//! - Verbose diagnostics

pub mod config;

pub use config::{AdapterConfig, Credential, Transport};
