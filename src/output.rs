//! Persisting rendered cards and reporting them back to the caller.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::post::check_file_stem;
use crate::rendering::Theme;
use crate::{Error, Result};

/// What the caller gets back once both themes of a post are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardManifest {
    pub timestamp: String,
    /// Permalink of the source post
    pub url: Option<String>,
}

/// Writes cards as `<dir>/<timestamp>-<theme>.svg`.
#[derive(Debug, Clone)]
pub struct CardWriter {
    dir: PathBuf,
}

impl CardWriter {
    /// Create the output directory (recursively) if needed.
    pub async fn create(dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            Error::WriteError(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn card_path(&self, timestamp: &str, theme: Theme) -> PathBuf {
        self.dir.join(format!("{}-{}.svg", timestamp, theme))
    }

    /// Write one card. The timestamp must be a plain file name stem.
    pub async fn write(&self, timestamp: &str, theme: Theme, contents: &str) -> Result<PathBuf> {
        check_file_stem(timestamp).map_err(Error::InvalidPost)?;
        let path = self.card_path(timestamp, theme);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| Error::WriteError(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Write a manifest of rendered posts as pretty JSON.
pub async fn write_manifest(path: &Path, entries: &[CardManifest]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| Error::WriteError(format!("Failed to serialize manifest: {}", e)))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::WriteError(format!("{}: {}", parent.display(), e)))?;
    }
    tokio::fs::write(path, json)
        .await
        .map_err(|e| Error::WriteError(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_cards_under_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a/b/cards");
        let writer = CardWriter::create(&dir).await.unwrap();
        let path = writer.write("170", Theme::Dark, "<svg/>").await.unwrap();
        assert_eq!(path, dir.join("170-dark.svg"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<svg/>");
    }

    #[tokio::test]
    async fn refuses_stems_outside_the_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = CardWriter::create(&tmp.path().join("cards")).await.unwrap();
        for stem in ["../escaped", "", "nested/card"] {
            let err = writer.write(stem, Theme::Light, "<svg/>").await.unwrap_err();
            assert!(matches!(err, Error::InvalidPost(_)), "{:?}", stem);
        }
        assert!(!tmp.path().join("escaped-light.svg").exists());
    }

    #[tokio::test]
    async fn manifest_round_trips_as_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out/manifest.json");
        let entries = vec![CardManifest {
            timestamp: "170".into(),
            url: Some("https://example.com/p/1".into()),
        }];
        write_manifest(&path, &entries).await.unwrap();
        let read: Vec<CardManifest> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, entries);
    }
}
