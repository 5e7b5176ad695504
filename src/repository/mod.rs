//! Removal of the deployed release artifact from the distribution repository.
//!
//! Deletion is best effort. Repository managers differ in what they allow
//! (the artifact may already be gone, the repository may be immutable, the
//! account may lack delete rights), so every outcome here is reported back
//! as data and never as an error that could stop a rollback.

mod http;
mod resolver;

pub use http::HttpArtifactStore;
pub use resolver::RepositoryResolver;

use crate::error::{RepositoryError, TransportError};
use crate::project::{ArtifactCoordinate, ProjectContext};
use std::fmt;
use std::future::Future;
use url::Url;

/// Status the repository manager answers a successful delete with
pub const DELETED_STATUS: u16 = 204;

/// Basic authentication credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name
    pub username: String,
    /// Password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Proxy applied to repository requests
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    /// `scheme://host:port`
    pub url: Url,
    /// Proxy credentials
    pub credentials: Option<Credentials>,
    /// Comma separated hosts that bypass the proxy
    pub no_proxy: Option<String>,
}

/// Resolved connection information for the distribution repository
#[derive(Debug, Clone)]
pub struct RepositoryTarget {
    /// Repository id
    pub id: String,
    /// Repository base URL
    pub url: Url,
    /// Credentials injected from the settings
    pub credentials: Option<Credentials>,
    /// Proxy injected from the settings
    pub proxy: Option<ProxyTarget>,
}

impl RepositoryTarget {
    /// `{baseUrl}/{groupId}/{artifactId}/{version}`
    pub fn artifact_url(&self, coordinate: &ArtifactCoordinate) -> String {
        format!(
            "{}/{}/{}/{}",
            self.url.as_str().trim_end_matches('/'),
            coordinate.group_id,
            coordinate.artifact_id,
            coordinate.version
        )
    }
}

/// HTTP access to the repository manager
pub trait ArtifactStore {
    /// Issue a DELETE and return the response status
    fn http_delete(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
        proxy: Option<&ProxyTarget>,
    ) -> impl Future<Output = Result<u16, TransportError>>;
}

/// What happened to the released artifact
#[derive(Debug)]
pub enum ArtifactDeletion {
    /// The repository confirmed the delete
    Deleted {
        /// Deleted URL
        url: String,
    },
    /// No usable repository, nothing was sent
    Skipped {
        /// Why resolution failed
        reason: RepositoryError,
    },
    /// The repository answered with something other than 204
    Rejected {
        /// Requested URL
        url: String,
        /// Response status
        status: u16,
    },
    /// The request never completed
    Failed {
        /// Requested URL
        url: String,
        /// Transport failure
        error: TransportError,
    },
}

impl ArtifactDeletion {
    /// Whether the artifact is known to be deleted
    pub fn is_deleted(&self) -> bool {
        matches!(self, ArtifactDeletion::Deleted { .. })
    }

    /// Human-readable description, used for warnings and the report
    pub fn describe(&self) -> String {
        match self {
            ArtifactDeletion::Deleted { url } => format!("Deleted {}", url),
            ArtifactDeletion::Skipped { reason } => format!(
                "Failed to find the release repo, any released artifacts will not be deleted ({})",
                reason
            ),
            ArtifactDeletion::Rejected { url, status: 404 } => format!(
                "Could not delete artifact, it may not have been deployed ({} answered 404)",
                url
            ),
            ArtifactDeletion::Rejected { url, status } => {
                format!("Could not delete artifact at {} (HTTP {})", url, status)
            }
            ArtifactDeletion::Failed { url, error } => {
                format!("Failed to delete artifact at {}: {}", url, error)
            }
        }
    }
}

/// Deletes the released artifact of a project
#[derive(Debug)]
pub struct ArtifactDeleter<S> {
    store: S,
    resolver: RepositoryResolver,
}

impl<S: ArtifactStore> ArtifactDeleter<S> {
    /// Create a deleter over an artifact store
    pub fn new(store: S, resolver: RepositoryResolver) -> Self {
        Self { store, resolver }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Delete `project` at the released `version`
    pub async fn delete_released(&self, project: &ProjectContext, version: &str) -> ArtifactDeletion {
        let target = match self.resolver.resolve(project) {
            Ok(target) => target,
            Err(reason) => return ArtifactDeletion::Skipped { reason },
        };

        let coordinate = project.coordinate(version);
        let url = target.artifact_url(&coordinate);
        log::info!("Deleting {} from repository '{}'", coordinate, target.id);
        log::debug!("DELETE {}", url);

        match self
            .store
            .http_delete(&url, target.credentials.as_ref(), target.proxy.as_ref())
            .await
        {
            Ok(DELETED_STATUS) => ArtifactDeletion::Deleted { url },
            Ok(status) => ArtifactDeletion::Rejected { url, status },
            Err(error) => ArtifactDeletion::Failed { url, error },
        }
    }
}
