//! Git operations for release tag removal.
//!
//! This module provides the VcsClient seam, its gix-backed implementation,
//! and the TagRemover that deletes a tag locally and pushes the deletion.

mod gix_client;
mod operations;
mod tag_remover;

pub use gix_client::{DEFAULT_REMOTE, GixRepository, GixVcsClient};
pub use operations::{VcsClient, delete_refspec, tag_ref_name};
pub use tag_remover::TagRemover;
