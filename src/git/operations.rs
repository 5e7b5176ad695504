//! Version control operations needed to remove a release tag.
//!
//! This module defines the VcsClient trait. The production implementation
//! lives in gix_client and combines gix (discovery, ref deletion) with the
//! git executable (push).

use crate::error::VcsError;
use std::future::Future;
use std::path::Path;

/// Trait defining the Git operations tag removal relies on
pub trait VcsClient {
    /// Opened repository handle
    type Repository;

    /// Open the repository containing `path`, honoring `GIT_DIR` and friends
    fn open_repository(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Self::Repository, VcsError>>;

    /// Delete tags from the local ref store.
    ///
    /// Returns the full ref names actually deleted. Tags that do not exist are
    /// skipped without error.
    fn delete_tags(
        &self,
        repo: &Self::Repository,
        tags: &[String],
    ) -> impl Future<Output = Result<Vec<String>, VcsError>>;

    /// Push refspecs (`:refs/tags/<name>` for deletions) to the configured remote
    fn push_deleted_refs(
        &self,
        repo: &Self::Repository,
        refspecs: &[String],
    ) -> impl Future<Output = Result<(), VcsError>>;
}

/// Full ref name for a tag; names already under `refs/tags/` are kept as is
pub fn tag_ref_name(tag: &str) -> String {
    if tag.starts_with("refs/tags/") {
        tag.to_string()
    } else {
        format!("refs/tags/{}", tag)
    }
}

/// Refspec deleting `reference` on the remote
pub fn delete_refspec(reference: &str) -> String {
    format!(":{}", reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_ref_name() {
        assert_eq!(tag_ref_name("release-1.0"), "refs/tags/release-1.0");
        assert_eq!(tag_ref_name("refs/tags/release-1.0"), "refs/tags/release-1.0");
    }

    #[test]
    fn test_delete_refspec() {
        assert_eq!(delete_refspec("refs/tags/v1"), ":refs/tags/v1");
    }
}
