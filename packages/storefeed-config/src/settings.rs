use std::path::PathBuf;
use std::time::Duration;

use crate::platform::Platform;

pub const DEFAULT_CONFIG_PATH: &str = "config/apps.json";
pub const DEFAULT_OUTPUT_PATH: &str = "data/apps-data.json";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1500;
pub const DEFAULT_RANKING_DELAY_MS: u64 = 2000;
pub const DEFAULT_TOP_LIST_SIZE: usize = 200;
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Which chart to look tracked apps up in for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingTarget {
    pub platform: Platform,
    pub collection: String,
    pub category: String,
}

impl RankingTarget {
    pub fn new(platform: Platform, collection: &str, category: &str) -> Self {
        Self {
            platform,
            collection: collection.to_string(),
            category: category.to_string(),
        }
    }

    /// Top free Tools on Google Play, top free Utilities on the App Store.
    pub fn defaults() -> Vec<RankingTarget> {
        vec![
            RankingTarget::new(Platform::Android, "topselling_free", "TOOLS"),
            RankingTarget::new(Platform::Ios, "topfreeapplications", "6002"),
        ]
    }
}

/// Store locale and URL rewriting shared by the provider clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub country: String,
    pub language: String,
    /// One `prefix -> replacement` rule per line; `regex:` prefixes a pattern.
    pub reverse_proxy: Option<String>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            reverse_proxy: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub output_path: PathBuf,
    /// Pause after every single-app lookup.
    pub request_delay: Duration,
    /// Pause between top-list lookups.
    pub ranking_delay: Duration,
    pub top_list_size: usize,
    /// Empty when rankings are skipped.
    pub rankings: Vec<RankingTarget>,
    pub store: StoreOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            ranking_delay: Duration::from_millis(DEFAULT_RANKING_DELAY_MS),
            top_list_size: DEFAULT_TOP_LIST_SIZE,
            rankings: RankingTarget::defaults(),
            store: StoreOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.output_path, PathBuf::from("data/apps-data.json"));
        assert_eq!(settings.request_delay, Duration::from_millis(1500));
        assert_eq!(settings.top_list_size, 200);
        assert_eq!(
            settings.rankings[1],
            RankingTarget::new(Platform::Ios, "topfreeapplications", "6002")
        );
        assert_eq!(settings.store.country, "us");
    }
}
