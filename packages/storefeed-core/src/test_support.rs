use chrono::NaiveDate;

use storefeed_config::Platform;
use storefeed_provider::{PlatformRecord, NO_UPDATE_NOTES};

use crate::app_data::AppData;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn record(platform: Platform, version: Option<&str>, last_updated: NaiveDate) -> PlatformRecord {
    PlatformRecord {
        platform,
        version: version.map(str::to_string),
        last_updated,
        notes: NO_UPDATE_NOTES.to_string(),
        rating: None,
        downloads: None,
        size: None,
        developer: None,
        url: Some("https://store.example/app".to_string()),
        icon: None,
        price: 0.0,
        free: true,
        offers_iap: false,
        iap_range: None,
        content_rating: None,
        genre: None,
    }
}

pub fn app_data(id: &str, records: Vec<PlatformRecord>) -> AppData {
    AppData {
        id: id.to_string(),
        name: format!("{} name", id),
        platforms: records
            .into_iter()
            .map(|record| (record.platform, record))
            .collect(),
    }
}
