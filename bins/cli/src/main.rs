//! MLflow Artifactory command-line tool.
//!
//! Runs single artifact operations against an Artifactory repository with
//! the same `ARTIFACTORY_*` configuration the tracker plugin reads.
//!
//! Usage: mlflow-artifactory <command> <artifact-uri> [args...]

use std::path::PathBuf;

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mlflow_artifactory_core::{AdapterConfig, ArtifactRepository, ArtifactoryRepository};

const USAGE: &str = "usage: mlflow-artifactory <command> <artifact-uri> [args...]

commands:
  put <file> [dest]             upload one file
  put-tree <dir> [dest]         upload a directory
  ls [path]                     list immediate children as JSON
  get <remote> <local-file>     download one file
  get-tree <local-dir> [path]   download a file or directory
  rm [path]                     delete a subtree";

/// One artifact operation.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Put { file: PathBuf, dest: Option<String> },
    PutTree { dir: PathBuf, dest: Option<String> },
    List { path: Option<String> },
    Get { remote: String, local: PathBuf },
    GetTree { local_dir: PathBuf, path: Option<String> },
    Remove { path: Option<String> },
}

impl Command {
    /// Parse a command name and its positional arguments.
    fn parse(name: &str, args: &[String]) -> anyhow::Result<Self> {
        let command = match (name, args) {
            ("put", [file]) => Self::Put {
                file: file.into(),
                dest: None,
            },
            ("put", [file, dest]) => Self::Put {
                file: file.into(),
                dest: Some(dest.clone()),
            },
            ("put-tree", [dir]) => Self::PutTree {
                dir: dir.into(),
                dest: None,
            },
            ("put-tree", [dir, dest]) => Self::PutTree {
                dir: dir.into(),
                dest: Some(dest.clone()),
            },
            ("ls", []) => Self::List { path: None },
            ("ls", [path]) => Self::List {
                path: Some(path.clone()),
            },
            ("get", [remote, local]) => Self::Get {
                remote: remote.clone(),
                local: local.into(),
            },
            ("get-tree", [local_dir]) => Self::GetTree {
                local_dir: local_dir.into(),
                path: None,
            },
            ("get-tree", [local_dir, path]) => Self::GetTree {
                local_dir: local_dir.into(),
                path: Some(path.clone()),
            },
            ("rm", []) => Self::Remove { path: None },
            ("rm", [path]) => Self::Remove {
                path: Some(path.clone()),
            },
            _ => bail!("{USAGE}"),
        };
        Ok(command)
    }

    async fn run(self, repo: &impl ArtifactRepository) -> anyhow::Result<()> {
        match self {
            Self::Put { file, dest } => {
                repo.put_object(&file, dest.as_deref()).await?;
            }
            Self::PutTree { dir, dest } => {
                repo.put_tree(&dir, dest.as_deref()).await?;
            }
            Self::List { path } => {
                let entries = repo.list_children(path.as_deref()).await?;
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            Self::Get { remote, local } => {
                repo.get_object(&remote, &local).await?;
                info!(remote = %remote, local = %local.display(), "artifact downloaded");
            }
            Self::GetTree { local_dir, path } => {
                let written = repo.get_tree(path.as_deref(), &local_dir).await?;
                info!(local = %written.display(), "artifacts downloaded");
            }
            Self::Remove { path } => {
                repo.delete_subtree(path.as_deref()).await?;
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AdapterConfig::load().context("Failed to load configuration")?;

    // Initialize tracing; logs go to stderr so listings stay pipeable
    let default_filter = if config.verbose {
        "mlflow_artifactory=debug"
    } else {
        "mlflow_artifactory=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [name, uri, rest @ ..] = args.as_slice() else {
        bail!("{USAGE}");
    };
    let command = Command::parse(name, rest)?;

    let repo = ArtifactoryRepository::new(uri, &config)
        .with_context(|| format!("Failed to open artifact repository {uri}"))?;
    command.run(&repo).await
}
