//! dub.selections.json reading.
//!
//! Dub pins the resolved version of every dependency in
//! `dub.selections.json`:
//!
//! ```json
//! {
//!   "fileVersion": 1,
//!   "versions": {
//!     "vibe-d": "0.9.5",
//!     "mir-core": { "version": "1.1.0" },
//!     "local-lib": { "path": "../local-lib" }
//!   }
//! }
//! ```
//!
//! Only `fileVersion` 1 is understood.

use crate::error::{DubError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Pinned entry for one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Version(String),
    Path { path: String },
    Detailed { version: String },
}

/// Parsed `dub.selections.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DubSelections {
    pub path: PathBuf,
    pub versions: HashMap<String, Selection>,
}

impl DubSelections {
    /// Version pinned for a package; `None` for path selections.
    pub fn locked_version(&self, name: &str) -> Option<&str> {
        match self.versions.get(name)? {
            Selection::Version(version) | Selection::Detailed { version } => Some(version.as_str()),
            Selection::Path { .. } => None,
        }
    }

    /// Local directory selected for a package.
    pub fn local_path(&self, name: &str) -> Option<&str> {
        match self.versions.get(name)? {
            Selection::Path { path } => Some(path.as_str()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionsFile {
    #[serde(default)]
    file_version: Option<serde_json::Value>,
    #[serde(default)]
    versions: HashMap<String, Selection>,
}

/// Reads and validates a `dub.selections.json` file.
///
/// Fails when the file does not exist or `fileVersion` is not 1.
pub async fn read_dub_selections(path: &Path) -> Result<DubSelections> {
    tracing::debug!("Reading dub.selections.json: {}", path.display());

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DubError::SelectionsNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(DubError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let file: SelectionsFile =
        serde_json::from_str(&content).map_err(|e| DubError::SelectionsParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    match &file.file_version {
        Some(version) if version.as_u64() == Some(1) => {}
        other => {
            return Err(DubError::UnsupportedFileVersion {
                path: path.to_path_buf(),
                version: other
                    .as_ref()
                    .map_or_else(|| "<missing>".to_string(), ToString::to_string),
            });
        }
    }

    tracing::debug!("Loaded {} dub selections", file.versions.len());

    Ok(DubSelections {
        path: path.to_path_buf(),
        versions: file.versions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_selections(content: &str) -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dub.selections.json");
        tokio::fs::write(&path, content).await.unwrap();
        (temp_dir, path)
    }

    #[tokio::test]
    async fn test_read_selections() {
        let (_dir, path) = write_selections(
            r#"{
  "fileVersion": 1,
  "versions": {
    "vibe-d": "0.9.5",
    "mir-core": { "version": "1.1.0" },
    "local-lib": { "path": "../local-lib" }
  }
}"#,
        )
        .await;

        let selections = read_dub_selections(&path).await.unwrap();

        assert_eq!(selections.versions.len(), 3);
        assert_eq!(selections.locked_version("vibe-d"), Some("0.9.5"));
        assert_eq!(selections.locked_version("mir-core"), Some("1.1.0"));
        assert_eq!(selections.locked_version("local-lib"), None);
        assert_eq!(selections.local_path("local-lib"), Some("../local-lib"));
        assert_eq!(selections.locked_version("unknown"), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dub.selections.json");

        let err = read_dub_selections(&path).await.unwrap_err();
        assert!(matches!(err, DubError::SelectionsNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_file_version_is_rejected() {
        let (_dir, path) = write_selections(r#"{"fileVersion": 2, "versions": {}}"#).await;

        let err = read_dub_selections(&path).await.unwrap_err();
        assert!(matches!(
            err,
            DubError::UnsupportedFileVersion { ref version, .. } if version == "2"
        ));
    }

    #[tokio::test]
    async fn test_missing_file_version_is_rejected() {
        let (_dir, path) = write_selections(r#"{"versions": {}}"#).await;

        let err = read_dub_selections(&path).await.unwrap_err();
        assert!(matches!(err, DubError::UnsupportedFileVersion { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let (_dir, path) = write_selections("{ not json").await;

        let err = read_dub_selections(&path).await.unwrap_err();
        assert!(matches!(err, DubError::SelectionsParseError { .. }));
    }
}
