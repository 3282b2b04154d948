use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::SnapshotError;
use crate::feed::FeedEntry;
use crate::snapshot::Snapshot;

/// Only the part of a previous snapshot that seeds the next run. Entries are
/// decoded one by one so a malformed entry costs only itself.
#[derive(Deserialize)]
struct History {
    #[serde(default)]
    feed: Vec<Value>,
}

/// Reads and writes the snapshot file at one path.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Feed of the previous snapshot. A missing or unreadable file starts a
    /// fresh history.
    pub fn load_history(&self) -> Vec<FeedEntry> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No existing snapshot, starting fresh");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read existing snapshot: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<History>(&content) {
            Ok(history) => {
                let total = history.feed.len();
                let feed: Vec<FeedEntry> = history
                    .feed
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, value)| {
                        serde_json::from_value::<FeedEntry>(value)
                            .map_err(|e| {
                                tracing::warn!(index, "Skipping malformed feed entry: {}", e);
                            })
                            .ok()
                    })
                    .collect();
                tracing::info!(
                    entries = feed.len(),
                    skipped = total - feed.len(),
                    "Loaded feed history"
                );
                feed
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to parse existing snapshot: {}", e);
                Vec::new()
            }
        }
    }

    /// Pretty-printed, written in a single call. Missing parent directories
    /// are created.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SnapshotError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|source| SnapshotError::Serialize { source })?;
        fs::write(&self.path, content).map_err(|source| SnapshotError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::merge_feed;
    use crate::test_support::{app_data, date, record};
    use chrono::Utc;
    use storefeed_config::Platform;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("apps-data.json"));
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps-data.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(SnapshotStore::new(path).load_history().is_empty());
    }

    #[test]
    fn test_save_creates_dirs_and_reloads_feed() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("data").join("nested").join("out.json"));

        let mut snapshot = Snapshot::fallback("unused", Utc::now());
        snapshot.metadata.error = None;
        snapshot.feed = merge_feed(
            Vec::new(),
            &[app_data(
                "a",
                vec![record(Platform::Android, Some("1.0"), date(2024, 1, 1))],
            )],
        )
        .feed;

        store.save(&snapshot).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("\n  \"apps\""));

        let history = store.load_history();
        assert_eq!(history, snapshot.feed);
    }

    #[test]
    fn test_history_ignores_other_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"{"vpnApps": [], "feed": [{"id": "x_ios_2", "appId": "x", "appName": "X",
                "platform": "ios", "version": "2", "lastUpdated": "2023-11-02"}]}"#,
        )
        .unwrap();
        let history = SnapshotStore::new(path).load_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].version, "2");
    }

    #[test]
    fn test_malformed_entry_skipped_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps-data.json");
        fs::write(
            &path,
            r#"{"feed": [
                {"id": "a_android_1", "appId": "a", "appName": "A", "platform": "android",
                 "version": "1", "lastUpdated": "2024-01-02", "size": "50 MB"},
                {"id": "b_ios_3", "appId": "b", "appName": "B", "platform": "ios",
                 "version": "3", "lastUpdated": "2024-01-01", "size": 52428800},
                {"id": "c_web_1", "appId": "c", "appName": "C", "platform": "web",
                 "version": "1", "lastUpdated": "2024-01-01"},
                {"id": "d_ios_2", "appId": "d", "appName": "D", "platform": "ios",
                 "version": "2"},
                {"id": "e_ios_5", "appId": "e", "appName": "E", "platform": "ios",
                 "version": "5", "lastUpdated": "2023-12-30"}
            ]}"#,
        )
        .unwrap();

        let history = SnapshotStore::new(path).load_history();
        let ids: Vec<&str> = history.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["a_android_1", "b_ios_3", "e_ios_5"]);
        assert_eq!(history[1].size.as_deref(), Some("52428800"));
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = SnapshotStore::new(blocker.join("out.json"));
        let result = store.save(&Snapshot::fallback("x", Utc::now()));
        assert!(matches!(result, Err(SnapshotError::CreateDir { .. })));
    }
}
