use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregate::{IapEntry, Stats};
use crate::app_data::AppData;
use crate::feed::FeedEntry;
use crate::rankings::Rankings;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub generated_at: DateTime<Utc>,
    /// Whole seconds, rounded.
    pub total_execution_time: u64,
    pub successful_apps: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The document written at the end of every run and read back as history
/// by the next one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub apps: Vec<AppData>,
    pub feed: Vec<FeedEntry>,
    pub stats: Stats,
    pub app_icons: BTreeMap<String, String>,
    pub iap: Vec<IapEntry>,
    pub rankings: Rankings,
    pub total_apps: usize,
    pub metadata: Metadata,
}

impl Snapshot {
    /// Empty document carrying the error that ended the run.
    pub fn fallback(error: impl ToString, now: DateTime<Utc>) -> Self {
        Self {
            apps: Vec::new(),
            feed: Vec::new(),
            stats: Stats::empty(now),
            app_icons: BTreeMap::new(),
            iap: Vec::new(),
            rankings: Rankings::default(),
            total_apps: 0,
            metadata: Metadata {
                generated_at: now,
                total_execution_time: 0,
                successful_apps: 0,
                error: Some(error.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fallback_shape() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
        let value = serde_json::to_value(Snapshot::fallback("disk full", now)).unwrap();

        assert_eq!(value["apps"], serde_json::json!([]));
        assert_eq!(value["feed"], serde_json::json!([]));
        assert_eq!(value["appIcons"], serde_json::json!({}));
        assert_eq!(value["iap"], serde_json::json!([]));
        assert_eq!(value["rankings"]["android"], serde_json::json!({}));
        assert_eq!(value["rankings"]["ios"], serde_json::json!({}));
        assert_eq!(value["stats"]["totalApps"], 0);
        assert_eq!(value["stats"]["recentUpdates"], 0);
        assert_eq!(value["stats"]["lastUpdated"], "2024-05-01T06:00:00Z");
        assert_eq!(value["totalApps"], 0);
        assert_eq!(value["metadata"]["error"], "disk full");
        assert_eq!(value["metadata"]["generatedAt"], "2024-05-01T06:00:00Z");
    }

    #[test]
    fn test_error_omitted_when_absent() {
        let mut snapshot = Snapshot::fallback("x", Utc::now());
        snapshot.metadata.error = None;
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value["metadata"].get("error").is_none());
    }
}
