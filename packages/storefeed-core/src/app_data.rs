use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use storefeed_config::{Platform, TrackedApp};
use storefeed_provider::PlatformRecord;

/// One tracked app and whatever the stores returned for it this run.
/// An app whose lookups all failed keeps an empty `platforms` map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub platforms: BTreeMap<Platform, PlatformRecord>,
}

impl AppData {
    pub fn empty(app: &TrackedApp) -> Self {
        Self {
            id: app.id.clone(),
            name: app.name.clone(),
            platforms: BTreeMap::new(),
        }
    }

    pub fn record(&self, platform: Platform) -> Option<&PlatformRecord> {
        self.platforms.get(&platform)
    }

    pub fn has_data(&self) -> bool {
        !self.platforms.is_empty()
    }
}
