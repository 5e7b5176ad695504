//! Release metadata written by the release process.
//!
//! The release plugin records what it did in `release.properties` at the
//! project root. Rollback reads the tag name and the released version from
//! there, since the project descriptor already carries the next development
//! version by the time a rollback is needed.

pub mod properties;

use crate::error::MetadataError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File name of the release metadata file
pub const RELEASE_PROPERTIES: &str = "release.properties";

/// Key holding the release tag name
pub const SCM_TAG_KEY: &str = "scm.tag";

/// Immutable view of `release.properties`
#[derive(Debug, Clone)]
pub struct ReleaseMetadata {
    path: PathBuf,
    properties: HashMap<String, String>,
}

impl ReleaseMetadata {
    /// Load `release.properties` from the project base directory
    pub fn load(base_dir: &Path) -> Result<Self, MetadataError> {
        let path = base_dir.join(RELEASE_PROPERTIES);
        let bytes = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                MetadataError::NotFound { path: path.clone() }
            } else {
                MetadataError::Unreadable {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let properties = properties::parse(&properties::decode(bytes));
        log::debug!(
            "Loaded {} release properties from {}",
            properties.len(),
            path.display()
        );

        Ok(Self { path, properties })
    }

    /// Path the metadata was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw property lookup
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// The release tag, required by tag removal
    pub fn scm_tag(&self) -> Result<&str, MetadataError> {
        self.get(SCM_TAG_KEY)
            .filter(|tag| !tag.is_empty())
            .ok_or_else(|| MetadataError::MissingKey {
                key: SCM_TAG_KEY.to_string(),
            })
    }

    /// The version released for `groupId:artifactId`, if recorded
    pub fn released_version(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.get(&released_version_key(group_id, artifact_id))
            .filter(|version| !version.is_empty())
    }
}

/// Key under which the release process records the released version
pub fn released_version_key(group_id: &str, artifact_id: &str) -> String {
    format!("project.rel.{}:{}", group_id, artifact_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ReleaseMetadata::load(dir.path()).expect_err("missing file");
        assert!(matches!(err, MetadataError::NotFound { .. }));
    }

    #[test]
    fn test_load_reads_tag_and_version() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(RELEASE_PROPERTIES),
            "scm.tag=demo-1.0\nproject.rel.org.example\\:demo=1.0\n",
        )
        .expect("write properties");

        let metadata = ReleaseMetadata::load(dir.path()).expect("load");
        assert_eq!(metadata.scm_tag().expect("tag"), "demo-1.0");
        assert_eq!(metadata.released_version("org.example", "demo"), Some("1.0"));
        assert_eq!(metadata.released_version("org.example", "other"), None);
    }

    #[test]
    fn test_empty_tag_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(RELEASE_PROPERTIES), "scm.tag=\n").expect("write properties");

        let metadata = ReleaseMetadata::load(dir.path()).expect("load");
        assert!(matches!(
            metadata.scm_tag(),
            Err(MetadataError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_released_version_key_format() {
        assert_eq!(
            released_version_key("org.example", "demo"),
            "project.rel.org.example:demo"
        );
    }
}
