use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use urlencoding::encode;

use storefeed_config::{Platform, StoreOptions};
use storefeed_utils::time::{normalize_date, today_utc};

use crate::base_provider::*;
use crate::data::{Downloads, PlatformRecord, TopListQuery, NO_UPDATE_NOTES};
use crate::error::ProviderError;

pub const ITUNES_URL: &str = "https://itunes.apple.com";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    result_count: usize,
    #[serde(default)]
    results: Vec<LookupApp>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct LookupApp {
    version: Option<String>,
    current_version_release_date: Option<String>,
    release_notes: Option<String>,
    average_user_rating: Option<f64>,
    file_size_bytes: Option<String>,
    artist_name: Option<String>,
    track_view_url: Option<String>,
    artwork_url512: Option<String>,
    artwork_url100: Option<String>,
    artwork_url60: Option<String>,
    price: Option<f64>,
    content_advisory_rating: Option<String>,
    primary_genre_name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RssResponse {
    feed: RssFeed,
}

#[derive(Deserialize, Debug)]
struct RssFeed {
    #[serde(default)]
    entry: Option<OneOrMany<RssEntry>>,
}

/// The RSS JSON feed collapses a single-entry list into a bare object.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Deserialize, Debug)]
struct RssEntry {
    id: RssId,
}

#[derive(Deserialize, Debug)]
struct RssId {
    attributes: RssIdAttributes,
}

#[derive(Deserialize, Debug)]
struct RssIdAttributes {
    #[serde(rename = "im:id")]
    im_id: String,
}

pub struct AppStoreProvider {
    options: StoreOptions,
}

impl Default for AppStoreProvider {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}

impl AppStoreProvider {
    pub fn new(options: StoreOptions) -> Self {
        AppStoreProvider { options }
    }

    fn get_lookup_url(&self, store_id: &str) -> String {
        format!(
            "{}/lookup?id={}&country={}&lang={}&entity=software",
            ITUNES_URL,
            encode(store_id),
            encode(&self.options.country),
            encode(&self.options.language)
        )
    }

    fn get_rss_url(&self, query: &TopListQuery) -> String {
        format!(
            "{}/{}/rss/{}/limit={}/genre={}/json",
            ITUNES_URL,
            encode(&self.options.country),
            encode(&query.collection),
            query.num,
            encode(&query.category)
        )
    }
}

impl StoreProviderExt for AppStoreProvider {
    fn store_options(&self) -> &StoreOptions {
        &self.options
    }
}

#[async_trait]
impl StoreProvider for AppStoreProvider {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn get_friendly_name(&self) -> &'static str {
        "app_store"
    }

    async fn get_app_info(&self, store_id: &str) -> Result<PlatformRecord, ProviderError> {
        let url = self.replace_proxy_url(&self.get_lookup_url(store_id));
        let body = fetch_text(&url).await?;
        let response: LookupResponse =
            serde_json::from_str(&body).map_err(|source| ProviderError::Json { url, source })?;
        if response.result_count == 0 {
            return Err(ProviderError::AppNotFound {
                store_id: store_id.to_string(),
            });
        }
        let app = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::AppNotFound {
                store_id: store_id.to_string(),
            })?;
        Ok(into_record(app, today_utc()))
    }

    async fn get_top_list(&self, query: &TopListQuery) -> Result<Vec<String>, ProviderError> {
        let url = self.replace_proxy_url(&self.get_rss_url(query));
        let body = fetch_text(&url).await?;
        let response: RssResponse =
            serde_json::from_str(&body).map_err(|source| ProviderError::Json { url, source })?;
        Ok(response
            .feed
            .entry
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.id.attributes.im_id)
            .take(query.num)
            .collect())
    }
}

fn into_record(app: LookupApp, today: NaiveDate) -> PlatformRecord {
    let price = app.price.unwrap_or(0.0);
    PlatformRecord {
        platform: Platform::Ios,
        version: app.version.filter(|v| !v.trim().is_empty()),
        last_updated: normalize_date(app.current_version_release_date.as_deref(), today),
        notes: app
            .release_notes
            .filter(|notes| !notes.trim().is_empty())
            .unwrap_or_else(|| NO_UPDATE_NOTES.to_string()),
        rating: app.average_user_rating,
        downloads: Some(Downloads::NotApplicable),
        size: app.file_size_bytes,
        developer: app.artist_name,
        url: app.track_view_url.filter(|url| !url.trim().is_empty()),
        icon: app.artwork_url512.or(app.artwork_url100).or(app.artwork_url60),
        price,
        free: price == 0.0,
        offers_iap: false,
        iap_range: None,
        content_rating: app.content_advisory_rating,
        genre: app.primary_genre_name,
    }
}
