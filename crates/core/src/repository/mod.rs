//! MLflow artifact repository backed by JFrog Artifactory.
//!
//! Every operation is translated into calls against the generic repository
//! REST API:
//!
//! ```text
//! put_object / put_tree   PUT    {base}/{container}/{path}
//! list_children           GET    {base}/api/storage/{container}/{path}
//!                         GET    {base}/api/storage/{container}/{path}?list&deep=0&depth=1&listFolders=1
//! get_object / get_tree   GET    {base}/{container}/{path}
//! delete_subtree          DELETE {base}/{container}/{path}
//! ```

mod artifact_repo;
mod artifactory;
mod error;
mod listing;
mod path;
mod uri;
mod urls;
mod walk;

pub use artifact_repo::ArtifactRepository;
pub use artifactory::{ArtifactoryRepository, CLIENT_USER_AGENT};
pub use error::{ArtifactError, ArtifactResult};
pub use listing::FileInfo;
pub use path::ArtifactPath;
pub use uri::{Endpoint, URI_SCHEME};
pub use urls::{FOLDER_LISTING_QUERY, StoreUrls};
pub use walk::{LocalTree, TreeFile, to_artifact_path};
