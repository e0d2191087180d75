//! The persisted unit of local data.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Collection, Raindrop};
use crate::{Error, Result};

/// Layout version written into every snapshot file.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

const fn default_format_version() -> u32 {
    SNAPSHOT_FORMAT_VERSION
}

/// Everything downloaded from the server, as of one moment.
///
/// `downloaded_at` is only ever set together with the lists it describes;
/// a snapshot that has never been downloaded has no timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_format_version")]
    format_version: u32,
    #[serde(default)]
    collections: Vec<Collection>,
    #[serde(default)]
    raindrops: Vec<Arc<Raindrop>>,
    #[serde(default)]
    downloaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// A snapshot that has never seen the server
    pub fn empty() -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            ..Self::default()
        }
    }

    pub fn new(
        collections: Vec<Collection>,
        raindrops: Vec<Raindrop>,
        downloaded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            collections,
            raindrops: raindrops.into_iter().map(Arc::new).collect(),
            downloaded_at,
        }
    }

    /// A freshly downloaded snapshot
    pub fn downloaded(
        collections: Vec<Collection>,
        raindrops: Vec<Raindrop>,
        downloaded_at: DateTime<Utc>,
    ) -> Self {
        Self::new(collections, raindrops, Some(downloaded_at))
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn raindrops(&self) -> &[Arc<Raindrop>] {
        &self.raindrops
    }

    pub const fn downloaded_at(&self) -> Option<DateTime<Utc>> {
        self.downloaded_at
    }

    /// Is the local copy older than the server's last activity?
    ///
    /// Never downloaded counts as stale; an unknown server time does not.
    pub fn is_stale(&self, server_last_action: Option<DateTime<Utc>>) -> bool {
        match (self.downloaded_at, server_last_action) {
            (None, _) => true,
            (Some(downloaded_at), Some(last_action)) => last_action > downloaded_at,
            (Some(_), None) => false,
        }
    }

    /// Read a snapshot file; `Ok(None)` when there is no file.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(Error::Io(error)),
        };

        let snapshot: Self = serde_json::from_slice(&raw).map_err(|error| Error::CorruptSnapshot {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(Error::CorruptSnapshot {
                path: path.to_path_buf(),
                reason: format!(
                    "unsupported format_version {} (expected at most {})",
                    snapshot.format_version, SNAPSHOT_FORMAT_VERSION
                ),
            });
        }
        Ok(Some(snapshot))
    }

    /// Write the snapshot next to `path` and move it into place.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionId, RaindropId, RaindropType};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn full_snapshot() -> Snapshot {
        let mut parent = Collection::new(CollectionId::new(1), "Reading");
        parent.color = "#00ff00".to_string();
        parent.cover = vec!["https://example.com/cover.png".to_string()];
        parent.created = Some(at(1_600_000_000));
        parent.public = true;
        parent.sort = 2;
        parent.expanded = true;
        parent.view = "list".to_string();
        let child = Collection::new(CollectionId::new(2), "Rust").with_parent(CollectionId::new(1));

        let mut detailed = Raindrop::new(RaindropId::new(10), CollectionId::new(2))
            .with_title("Rust book")
            .with_link("https://doc.rust-lang.org/book/")
            .with_excerpt("Learn Rust")
            .with_tags(["Rust", "books"])
            .with_broken(true);
        detailed.note = "chapter 16 is the good one".to_string();
        detailed.created = Some(at(1_650_000_000));
        detailed.important = true;
        detailed.kind = RaindropType::Document;
        detailed.cover = Some("https://example.com/book.png".to_string());
        let sparse = Raindrop::new(RaindropId::new(11), CollectionId::new(-1));

        Snapshot::downloaded(vec![parent, child], vec![detailed, sparse], at(1_700_000_000))
    }

    fn as_json(snapshot: &Snapshot) -> serde_json::Value {
        serde_json::to_value(snapshot).unwrap()
    }

    #[test]
    fn write_then_read_round_trips_every_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("raindrops.json");
        let snapshot = full_snapshot();

        snapshot.write(&path).unwrap();
        let loaded = Snapshot::read(&path).unwrap().unwrap();

        assert_eq!(as_json(&loaded), as_json(&snapshot));
        assert_eq!(loaded.raindrops()[1].created, None);
        assert_eq!(loaded.collections()[0].last_update, None);
        assert_eq!(loaded.downloaded_at(), Some(at(1_700_000_000)));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn empty_snapshot_round_trips_without_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raindrops.json");
        Snapshot::empty().write(&path).unwrap();

        let loaded = Snapshot::read(&path).unwrap().unwrap();
        assert_eq!(loaded.downloaded_at(), None);
        assert!(loaded.raindrops().is_empty());
        assert!(loaded.collections().is_empty());
    }

    #[test]
    fn read_missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert!(Snapshot::read(&dir.path().join("absent.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn read_rejects_garbage_and_future_versions() {
        let dir = tempdir().unwrap();
        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "{ not json").unwrap();
        assert!(matches!(
            Snapshot::read(&garbage),
            Err(Error::CorruptSnapshot { .. })
        ));

        let future = dir.path().join("future.json");
        fs::write(&future, r#"{"format_version": 99}"#).unwrap();
        let error = Snapshot::read(&future).unwrap_err();
        assert!(error.to_string().contains("format_version 99"));
    }

    #[test]
    fn staleness_compares_against_download_time() {
        let never = Snapshot::empty();
        assert!(never.is_stale(None));
        assert!(never.is_stale(Some(at(0))));

        let snapshot = full_snapshot();
        assert!(!snapshot.is_stale(None));
        assert!(!snapshot.is_stale(Some(at(1_699_999_999))));
        assert!(!snapshot.is_stale(Some(at(1_700_000_000))));
        assert!(snapshot.is_stale(Some(at(1_700_000_001))));
    }
}
