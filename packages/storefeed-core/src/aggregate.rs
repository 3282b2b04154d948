use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use storefeed_config::Platform;

use crate::app_data::AppData;
use crate::feed::FeedEntry;

pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Distinct app ids in the feed.
    pub total_apps: usize,
    pub recent_updates: usize,
    pub android_apps: usize,
    pub ios_apps: usize,
    pub last_updated: DateTime<Utc>,
}

impl Stats {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            total_apps: 0,
            recent_updates: 0,
            android_apps: 0,
            ios_apps: 0,
            last_updated: now,
        }
    }
}

/// An entry counts as recent when the start of its update day lies after
/// `now` minus seven days.
pub fn compute_stats(feed: &[FeedEntry], now: DateTime<Utc>) -> Stats {
    let window_start = now - Duration::days(RECENT_WINDOW_DAYS);
    let platform_count =
        |platform: Platform| feed.iter().filter(|entry| entry.platform == platform).count();

    Stats {
        total_apps: feed
            .iter()
            .map(|entry| entry.app_id.as_str())
            .collect::<HashSet<_>>()
            .len(),
        recent_updates: feed
            .iter()
            .filter(|entry| entry.last_updated.and_time(NaiveTime::MIN).and_utc() > window_start)
            .count(),
        android_apps: platform_count(Platform::Android),
        ios_apps: platform_count(Platform::Ios),
        last_updated: now,
    }
}

/// One icon per app id, iOS artwork first. Apps without any icon are left out.
pub fn build_icon_map(apps: &[AppData]) -> BTreeMap<String, String> {
    apps.iter()
        .filter_map(|app| {
            [Platform::Ios, Platform::Android]
                .into_iter()
                .filter_map(|platform| app.record(platform)?.icon.as_deref())
                .find(|icon| !icon.is_empty())
                .map(|icon| (app.id.clone(), icon.to_string()))
        })
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AndroidPricing {
    pub free: bool,
    pub price: f64,
    #[serde(rename = "offersIAP")]
    pub offers_iap: bool,
    #[serde(rename = "iapRange")]
    pub iap_range: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IosPricing {
    pub free: bool,
    pub price: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IapEntry {
    pub id: String,
    pub name: String,
    pub android: Option<AndroidPricing>,
    pub ios: Option<IosPricing>,
}

/// Pricing per tracked app; a platform without a record this run is `null`.
pub fn build_iap_summary(apps: &[AppData]) -> Vec<IapEntry> {
    apps.iter()
        .map(|app| IapEntry {
            id: app.id.clone(),
            name: app.name.clone(),
            android: app.record(Platform::Android).map(|record| AndroidPricing {
                free: record.free,
                price: record.price,
                offers_iap: record.offers_iap,
                iap_range: record.iap_range.clone(),
            }),
            ios: app.record(Platform::Ios).map(|record| IosPricing {
                free: record.free,
                price: record.price,
            }),
        })
        .collect()
}
