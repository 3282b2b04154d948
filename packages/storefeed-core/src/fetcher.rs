use std::time::Duration;

use storefeed_config::{Platform, TrackedApp};
use storefeed_provider::ProviderManager;

use crate::app_data::AppData;

/// Sequential per-app lookups with a fixed pause after every store call.
pub struct Fetcher<'a> {
    providers: &'a ProviderManager,
    delay: Duration,
}

impl<'a> Fetcher<'a> {
    pub fn new(providers: &'a ProviderManager, delay: Duration) -> Self {
        Self { providers, delay }
    }

    /// One result per tracked app, in roster order.
    pub async fn fetch_all(&self, apps: &[TrackedApp]) -> Vec<AppData> {
        let mut results = Vec::with_capacity(apps.len());
        for app in apps {
            results.push(self.fetch_app(app).await);
        }
        results
    }

    /// A failed store lookup drops only that platform's record.
    pub async fn fetch_app(&self, app: &TrackedApp) -> AppData {
        tracing::info!(app = %app.id, "Fetching {}", app.name);
        let mut data = AppData::empty(app);

        for platform in Platform::ALL {
            let Some(store_id) = app.store_id(platform) else {
                continue;
            };
            match self.providers.get_app_info(platform, store_id).await {
                Ok(record) => {
                    tracing::debug!(
                        app = %app.id,
                        platform = %platform,
                        version = record.version.as_deref().unwrap_or("?"),
                        "Store lookup succeeded"
                    );
                    data.platforms.insert(platform, record);
                }
                Err(e) => {
                    tracing::warn!(
                        app = %app.id,
                        platform = %platform,
                        "Failed to fetch {} data: {}",
                        platform.display_name(),
                        e
                    );
                }
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        if !data.has_data() {
            tracing::warn!(app = %app.id, "No store data for {}", app.name);
        }
        data
    }
}
