use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use urlencoding::encode;

use storefeed_config::{Platform, StoreOptions};
use storefeed_utils::time::{date_from_unix, today_utc};

use crate::base_provider::*;
use crate::data::{Downloads, PlatformRecord, TopListQuery, NO_UPDATE_NOTES};
use crate::error::ProviderError;

pub const GOOGLE_PLAY_URL: &str = "https://play.google.com";

// AF_initDataCallback({key: 'ds:5', hash: '12', data:[...], sideChannel: {}});
static DS5_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)AF_initDataCallback\(\{key:\s*'ds:5',\s*hash:\s*'[^']*',\s*data:\s*(\[.+?\]),\s*sideChannel:",
    )
    .expect("ds:5 pattern is valid")
});

static DETAILS_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/store/apps/details\?id=([A-Za-z0-9_.]+)")
        .expect("details link pattern is valid")
});

// JSON pointers into the ds:5 payload.
const PATH_VERSION: &str = "/1/2/140/0/0/0";
const PATH_UPDATED: &str = "/1/2/145/0/1/0";
const PATH_RECENT_CHANGES: &str = "/1/2/144/1/1";
const PATH_SCORE: &str = "/1/2/51/0/1";
const PATH_INSTALLS: &str = "/1/2/13/0";
const PATH_DEVELOPER: &str = "/1/2/68/0";
const PATH_ICON: &str = "/1/2/95/0/3/2";
const PATH_PRICE_MICROS: &str = "/1/2/57/0/0/0/0/1/0/0";
const PATH_IAP_RANGE: &str = "/1/2/19/0";
const PATH_CONTENT_RATING: &str = "/1/2/9/0";
const PATH_GENRE: &str = "/1/2/79/0/0/0";

/// Play reports this instead of a version when it depends on the device.
const VARIES_WITH_DEVICE: &str = "VARY";

pub struct GooglePlayProvider {
    options: StoreOptions,
}

impl Default for GooglePlayProvider {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}

impl GooglePlayProvider {
    pub fn new(options: StoreOptions) -> Self {
        GooglePlayProvider { options }
    }

    pub fn get_details_url(store_id: &str) -> String {
        format!("{}/store/apps/details?id={}", GOOGLE_PLAY_URL, encode(store_id))
    }

    fn get_localized_details_url(&self, store_id: &str) -> String {
        format!(
            "{}&hl={}&gl={}",
            GooglePlayProvider::get_details_url(store_id),
            encode(&self.options.language),
            encode(&self.options.country)
        )
    }

    fn get_list_url(&self, query: &TopListQuery) -> String {
        format!(
            "{}/store/apps/category/{}/collection/{}?hl={}&gl={}",
            GOOGLE_PLAY_URL,
            encode(&query.category),
            encode(&query.collection),
            encode(&self.options.language),
            encode(&self.options.country)
        )
    }
}

impl StoreProviderExt for GooglePlayProvider {
    fn store_options(&self) -> &StoreOptions {
        &self.options
    }
}

#[async_trait]
impl StoreProvider for GooglePlayProvider {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn get_friendly_name(&self) -> &'static str {
        "google_play"
    }

    async fn get_app_info(&self, store_id: &str) -> Result<PlatformRecord, ProviderError> {
        let url = self.replace_proxy_url(&self.get_localized_details_url(store_id));
        let html = match fetch_text(&url).await {
            Err(ProviderError::Status { status: 404, .. }) => {
                return Err(ProviderError::AppNotFound {
                    store_id: store_id.to_string(),
                })
            }
            result => result?,
        };
        let data = extract_ds5(&html).ok_or_else(|| ProviderError::MissingData {
            url: url.clone(),
            what: "ds:5 app data",
        })?;
        let data: Value =
            serde_json::from_str(data).map_err(|source| ProviderError::Json { url, source })?;
        Ok(parse_app_record(store_id, &data, today_utc()))
    }

    async fn get_top_list(&self, query: &TopListQuery) -> Result<Vec<String>, ProviderError> {
        let url = self.replace_proxy_url(&self.get_list_url(query));
        let html = fetch_text(&url).await?;
        let ids = parse_list_ids(&html, query.num);
        if ids.is_empty() {
            return Err(ProviderError::MissingData {
                url,
                what: "chart entries",
            });
        }
        Ok(ids)
    }
}

fn extract_ds5(html: &str) -> Option<&str> {
    DS5_RE
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

fn pointer_str<'a>(data: &'a Value, path: &str) -> Option<&'a str> {
    data.pointer(path)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn pointer_string(data: &Value, path: &str) -> Option<String> {
    pointer_str(data, path).map(str::to_string)
}

/// Map the ds:5 payload of a details page into a record.
pub fn parse_app_record(store_id: &str, data: &Value, today: NaiveDate) -> PlatformRecord {
    let version = pointer_string(data, PATH_VERSION).filter(|v| v != VARIES_WITH_DEVICE);
    let last_updated = data
        .pointer(PATH_UPDATED)
        .and_then(Value::as_i64)
        .and_then(date_from_unix)
        .unwrap_or(today);
    let notes = pointer_string(data, PATH_RECENT_CHANGES)
        .unwrap_or_else(|| NO_UPDATE_NOTES.to_string());
    let price = data
        .pointer(PATH_PRICE_MICROS)
        .and_then(Value::as_f64)
        .map(|micros| micros / 1_000_000.0)
        .unwrap_or(0.0);
    let iap_range = pointer_string(data, PATH_IAP_RANGE);

    PlatformRecord {
        platform: Platform::Android,
        version,
        last_updated,
        notes,
        rating: data.pointer(PATH_SCORE).and_then(Value::as_f64),
        downloads: pointer_string(data, PATH_INSTALLS).map(Downloads::Count),
        size: None,
        developer: pointer_string(data, PATH_DEVELOPER),
        url: Some(GooglePlayProvider::get_details_url(store_id)),
        icon: pointer_string(data, PATH_ICON),
        price,
        free: price == 0.0,
        offers_iap: iap_range.is_some(),
        iap_range,
        content_rating: pointer_string(data, PATH_CONTENT_RATING),
        genre: pointer_string(data, PATH_GENRE),
    }
}

/// Package ids linked from a chart page, in page order, without repeats.
pub fn parse_list_ids(html: &str, num: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    DETAILS_LINK_RE
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str())
        .filter(|id| seen.insert(*id))
        .take(num)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details_payload() -> Value {
        let mut details = vec![Value::Null; 146];
        details[9] = json!(["Everyone"]);
        details[13] = json!(["10,000,000+"]);
        details[19] = json!(["$0.99 - $99.99 per item"]);
        details[51] = json!([[null, 4.25]]);
        details[57] = json!([[[[[null, [[2990000]]]]]]]);
        details[68] = json!(["Proton AG"]);
        details[79] = json!([[["Tools"]]]);
        details[95] = json!([[null, null, null, [null, null, "https://play-lh/icon.png"]]]);
        details[140] = json!([[["5.1.40"]]]);
        details[144] = json!([null, [null, "Bug fixes"]]);
        details[145] = json!([[null, [1709251200]]]);
        json!([null, [null, null, details]])
    }

    #[test]
    fn test_parse_app_record() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let record = parse_app_record("ch.protonvpn.android", &details_payload(), today);

        assert_eq!(record.platform, Platform::Android);
        assert_eq!(record.version.as_deref(), Some("5.1.40"));
        assert_eq!(
            record.last_updated,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(record.notes, "Bug fixes");
        assert_eq!(record.rating, Some(4.25));
        assert_eq!(
            record.downloads,
            Some(Downloads::Count("10,000,000+".to_string()))
        );
        assert_eq!(record.developer.as_deref(), Some("Proton AG"));
        assert_eq!(record.icon.as_deref(), Some("https://play-lh/icon.png"));
        assert_eq!(record.price, 2.99);
        assert!(!record.free);
        assert!(record.offers_iap);
        assert_eq!(record.iap_range.as_deref(), Some("$0.99 - $99.99 per item"));
        assert_eq!(record.content_rating.as_deref(), Some("Everyone"));
        assert_eq!(record.genre.as_deref(), Some("Tools"));
        assert_eq!(
            record.url.as_deref(),
            Some("https://play.google.com/store/apps/details?id=ch.protonvpn.android")
        );
    }

    #[test]
    fn test_parse_sparse_record_uses_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut details = vec![Value::Null; 141];
        details[140] = json!([[["VARY"]]]);
        let data = json!([null, [null, null, details]]);

        let record = parse_app_record("a.b", &data, today);
        assert_eq!(record.version, None);
        assert_eq!(record.last_updated, today);
        assert_eq!(record.notes, NO_UPDATE_NOTES);
        assert!(record.free);
        assert!(!record.offers_iap);
        assert_eq!(record.downloads, None);
    }

    #[test]
    fn test_extract_ds5() {
        let html = "<script>AF_initDataCallback({key: 'ds:4', hash: '1', data:[1], sideChannel: {}});</script>\
            <script>AF_initDataCallback({key: 'ds:5', hash: '7', data:[null,\n[2]], sideChannel: {}});</script>";
        assert_eq!(extract_ds5(html), Some("[null,\n[2]]"));
        assert_eq!(extract_ds5("<html></html>"), None);
    }

    #[test]
    fn test_parse_list_ids() {
        let html = r#"
            <a href="/store/apps/details?id=com.a">A</a><img src="x"><a href="/store/apps/details?id=com.a">A</a>
            <a href="/store/apps/details?id=com.b&hl=en">B</a>
            <a href="/store/apps/details?id=org.c_d">C</a>
        "#;
        assert_eq!(parse_list_ids(html, 10), vec!["com.a", "com.b", "org.c_d"]);
        assert_eq!(parse_list_ids(html, 2), vec!["com.a", "com.b"]);
    }
}
