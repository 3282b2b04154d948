use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storefeed_config::Platform;

pub const NO_UPDATE_NOTES: &str = "No update notes available";

const NOT_APPLICABLE: &str = "N/A";

/// Install count as the store reports it, e.g. `"10,000,000+"`.
/// The App Store publishes no download figures.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Downloads {
    Count(String),
    NotApplicable,
}

impl From<String> for Downloads {
    fn from(value: String) -> Self {
        if value == NOT_APPLICABLE {
            Downloads::NotApplicable
        } else {
            Downloads::Count(value)
        }
    }
}

impl From<Downloads> for String {
    fn from(value: Downloads) -> Self {
        match value {
            Downloads::Count(count) => count,
            Downloads::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }
}

/// One app's metadata as reported by one store for the current run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRecord {
    pub platform: Platform,
    pub version: Option<String>,
    pub last_updated: NaiveDate,
    pub notes: String,
    pub rating: Option<f64>,
    pub downloads: Option<Downloads>,
    pub size: Option<String>,
    pub developer: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub price: f64,
    pub free: bool,
    #[serde(rename = "offersIAP")]
    pub offers_iap: bool,
    #[serde(rename = "iapRange")]
    pub iap_range: Option<String>,
    pub content_rating: Option<String>,
    pub genre: Option<String>,
}

/// Chart lookup parameters. `collection` and `category` use each store's own
/// vocabulary (`topselling_free`/`TOOLS` on Google Play,
/// `topfreeapplications`/`6002` on the App Store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopListQuery {
    pub collection: String,
    pub category: String,
    pub num: usize,
}
