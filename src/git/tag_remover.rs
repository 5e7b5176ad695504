//! Removal of the release tag, locally and on the remote.

use crate::error::VcsError;
use crate::git::operations::{VcsClient, delete_refspec};
use std::path::Path;

/// Deletes a release tag through a [`VcsClient`]
#[derive(Debug)]
pub struct TagRemover<C> {
    client: C,
}

impl<C: VcsClient> TagRemover<C> {
    /// Create a tag remover
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Delete `tag` in the repository containing `base_dir` and push one
    /// deletion per locally deleted ref.
    ///
    /// The first failing push fails the whole removal; deletions pushed before
    /// it stay on the remote.
    pub async fn remove(&self, base_dir: &Path, tag: &str) -> Result<Vec<String>, VcsError> {
        let repo = self.client.open_repository(base_dir).await?;
        let deleted = self.client.delete_tags(&repo, &[tag.to_string()]).await?;

        if deleted.is_empty() {
            log::info!("Tag '{}' not found locally; nothing pushed", tag);
        }

        for reference in &deleted {
            log::info!("Pushing deletion of {}", reference);
            self.client
                .push_deleted_refs(&repo, &[delete_refspec(reference)])
                .await?;
        }

        Ok(deleted)
    }
}
