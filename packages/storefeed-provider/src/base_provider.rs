use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;

use storefeed_config::{Platform, StoreOptions};
use storefeed_utils::http::get;

use crate::data::{PlatformRecord, TopListQuery};
use crate::error::ProviderError;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait StoreProvider: Send + Sync {
    fn platform(&self) -> Platform;

    fn get_friendly_name(&self) -> &'static str;

    /// Current metadata for one app, by its store identifier.
    async fn get_app_info(&self, store_id: &str) -> Result<PlatformRecord, ProviderError>;

    /// Store identifiers of a chart, best-ranked first.
    async fn get_top_list(&self, query: &TopListQuery) -> Result<Vec<String>, ProviderError>;
}

pub trait StoreProviderExt {
    fn store_options(&self) -> &StoreOptions;

    fn url_proxy_map(&self) -> HashMap<String, String> {
        if let Some(proxy_map) = &self.store_options().reverse_proxy {
            proxy_map
                .lines()
                .map(|line| {
                    let mut parts = line.splitn(2, "->");
                    let url_prefix = parts.next().unwrap_or_default().trim();
                    let proxy_url = parts.next().unwrap_or_default().trim();
                    (url_prefix.to_string(), proxy_url.to_string())
                })
                .filter(|v| !v.0.is_empty() && !v.1.is_empty())
                .collect::<HashMap<String, String>>()
        } else {
            HashMap::new()
        }
    }

    fn replace_proxy_url(&self, url: &str) -> String {
        let mut result_url = url.to_string();
        for (url_prefix, proxy_url) in self.url_proxy_map().iter() {
            if let Some(pattern) = url_prefix.strip_prefix("regex:") {
                if let Ok(re) = Regex::new(pattern.trim()) {
                    result_url = re.replace_all(&result_url, proxy_url.as_str()).to_string();
                }
            } else {
                result_url = result_url.replace(url_prefix, proxy_url);
            }
        }
        result_url
    }
}

/// GET `url` and return the body text, treating non-2xx/3xx as an error.
pub async fn fetch_text(url: &str) -> Result<String, ProviderError> {
    let parsed_url = url.parse::<hyper::Uri>().map_err(|source| ProviderError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let header_map = HashMap::from([("User-Agent".to_string(), USER_AGENT.to_string())]);
    tracing::debug!(url, "GET");
    let rsp = get(parsed_url, &header_map)
        .await
        .map_err(|source| ProviderError::Request {
            url: url.to_string(),
            source,
        })?;
    if !rsp.is_ok() {
        tracing::debug!(url, status = rsp.status, "Store returned an error status");
        return Err(ProviderError::Status {
            url: url.to_string(),
            status: rsp.status,
        });
    }
    Ok(rsp.text())
}
