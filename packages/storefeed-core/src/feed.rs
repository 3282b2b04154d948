//! Historical feed of version observations.
//!
//! Every (app, platform, version) the pipeline has ever seen is kept as one
//! [`FeedEntry`]. Each run folds the freshly fetched records into the entries
//! loaded from the previous snapshot: an unseen key adds an entry, a known
//! key is overwritten with the current data, and nothing is ever removed.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use storefeed_config::Platform;
use storefeed_provider::{Downloads, PlatformRecord, NO_UPDATE_NOTES};

use crate::app_data::AppData;

/// Stands in for a version the store did not report.
pub const UNKNOWN_VERSION: &str = "Unknown";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub id: String,
    pub app_id: String,
    pub app_name: String,
    pub platform: Platform,
    pub version: String,
    pub last_updated: NaiveDate,
    #[serde(default = "default_notes")]
    pub notes: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub downloads: Option<Downloads>,
    #[serde(default, deserialize_with = "lenient_size")]
    pub size: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_notes() -> String {
    NO_UPDATE_NOTES.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeField {
    Text(String),
    Bytes(u64),
    Float(f64),
}

/// Older snapshots stored the byte count as a number.
fn lenient_size<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<SizeField>::deserialize(deserializer)?.map(|size| match size {
            SizeField::Text(text) => text,
            SizeField::Bytes(bytes) => bytes.to_string(),
            SizeField::Float(bytes) => bytes.to_string(),
        }),
    )
}

impl FeedEntry {
    pub fn from_record(app: &AppData, platform: Platform, record: &PlatformRecord) -> Self {
        let version = record
            .version
            .clone()
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
        let key = FeedKey::new(&app.id, platform, &version);
        Self {
            id: key.to_string(),
            app_id: app.id.clone(),
            app_name: app.name.clone(),
            platform,
            version,
            last_updated: record.last_updated,
            notes: if record.notes.is_empty() {
                default_notes()
            } else {
                record.notes.clone()
            },
            rating: record.rating,
            downloads: record.downloads.clone(),
            size: record.size.clone(),
            developer: record.developer.clone(),
            url: record.url.clone(),
            icon: record.icon.clone(),
        }
    }

    pub fn key(&self) -> FeedKey {
        FeedKey::new(&self.app_id, self.platform, &self.version)
    }
}

/// Dedup key of the feed. Its `Display` form is the entry id,
/// `<appId>_<platform>_<version>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeedKey {
    pub app_id: String,
    pub platform: Platform,
    pub version: String,
}

impl FeedKey {
    pub fn new(app_id: &str, platform: Platform, version: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            platform,
            version: version.to_string(),
        }
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.app_id, self.platform, self.version)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Newest `last_updated` first.
    pub feed: Vec<FeedEntry>,
    /// Current-run records whose key was not in the history.
    pub new_versions: usize,
}

/// Fold this run's records into the historical feed.
///
/// Current data wins on key collision. Entries with equal dates keep key
/// order, so identical inputs always produce an identical feed.
pub fn merge_feed(history: Vec<FeedEntry>, apps: &[AppData]) -> MergeOutcome {
    let mut entries: BTreeMap<FeedKey, FeedEntry> = history
        .into_iter()
        .map(|entry| (entry.key(), entry))
        .collect();

    let mut new_versions = 0;
    for app in apps {
        for (platform, record) in &app.platforms {
            let entry = FeedEntry::from_record(app, *platform, record);
            if entries.insert(entry.key(), entry).is_none() {
                new_versions += 1;
            }
        }
    }

    let mut feed: Vec<FeedEntry> = entries.into_values().collect();
    feed.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    MergeOutcome { feed, new_versions }
}
