use chrono::Utc;
use std::time::Instant;

use storefeed_config::{AppsConfig, Platform, Settings};
use storefeed_provider::ProviderManager;

use crate::aggregate::{build_iap_summary, build_icon_map, compute_stats};
use crate::error::RunError;
use crate::feed::merge_feed;
use crate::fetcher::Fetcher;
use crate::rankings::RankingCollector;
use crate::snapshot::{Metadata, Snapshot};
use crate::store::SnapshotStore;

/// One run: load history, fetch every tracked app, merge, aggregate, write.
pub struct Pipeline {
    settings: Settings,
    providers: ProviderManager,
    store: SnapshotStore,
}

impl Pipeline {
    /// Uses the Google Play and App Store clients.
    pub fn new(settings: Settings) -> Self {
        let providers = ProviderManager::with_defaults(&settings.store);
        Self::with_providers(settings, providers)
    }

    pub fn with_providers(settings: Settings, providers: ProviderManager) -> Self {
        let store = SnapshotStore::new(settings.output_path.clone());
        Self {
            settings,
            providers,
            store,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub async fn run(&self, config: &AppsConfig) -> Result<Snapshot, RunError> {
        let started = Instant::now();
        tracing::info!(apps = config.apps.len(), "Starting store data collection");

        let history = self.store.load_history();

        let fetcher = Fetcher::new(&self.providers, self.settings.request_delay);
        let apps = fetcher.fetch_all(&config.apps).await;

        let merged = merge_feed(history, &apps);
        tracing::info!(
            new_versions = merged.new_versions,
            "New versions detected: {}",
            merged.new_versions
        );

        let now = Utc::now();
        let stats = compute_stats(&merged.feed, now);
        let app_icons = build_icon_map(&apps);
        let iap = build_iap_summary(&apps);

        let rankings = if self.settings.rankings.is_empty() {
            tracing::info!("Skipping rankings");
            Default::default()
        } else {
            RankingCollector::new(
                &self.providers,
                self.settings.ranking_delay,
                self.settings.top_list_size,
            )
            .collect(&self.settings.rankings, &config.apps)
            .await
        };

        let successful_apps = apps.iter().filter(|app| app.has_data()).count();
        let total_execution_time = started.elapsed().as_secs_f64().round() as u64;
        let snapshot = Snapshot {
            total_apps: apps.len(),
            apps,
            feed: merged.feed,
            stats,
            app_icons,
            iap,
            rankings,
            metadata: Metadata {
                generated_at: now,
                total_execution_time,
                successful_apps,
                error: None,
            },
        };

        self.store.save(&snapshot)?;

        tracing::info!(
            path = %self.store.path().display(),
            total_apps = snapshot.stats.total_apps,
            recent_updates = snapshot.stats.recent_updates,
            android = snapshot.stats.android_apps,
            ios = snapshot.stats.ios_apps,
            successful_apps,
            seconds = total_execution_time,
            "Snapshot written"
        );
        for platform in Platform::ALL {
            tracing::info!(
                platform = %platform,
                ranked = snapshot.rankings.for_platform(platform).len(),
                "{} apps in the top chart",
                platform.display_name()
            );
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, record};
    use async_trait::async_trait;
    use std::time::Duration;
    use storefeed_config::TrackedApp;
    use storefeed_provider::{PlatformRecord, ProviderError, StoreProvider, TopListQuery};
    use tempfile::TempDir;

    struct StaticProvider(Platform);

    #[async_trait]
    impl StoreProvider for StaticProvider {
        fn platform(&self) -> Platform {
            self.0
        }

        fn get_friendly_name(&self) -> &'static str {
            "static"
        }

        async fn get_app_info(&self, _store_id: &str) -> Result<PlatformRecord, ProviderError> {
            let mut record = record(self.0, Some("2.0"), date(2024, 4, 2));
            record.icon = Some(format!("https://icons.example/{}.png", self.0));
            Ok(record)
        }

        async fn get_top_list(&self, _query: &TopListQuery) -> Result<Vec<String>, ProviderError> {
            Ok(vec!["other".to_string(), "app.one".to_string()])
        }
    }

    fn settings(dir: &TempDir) -> Settings {
        Settings {
            output_path: dir.path().join("out").join("apps-data.json"),
            request_delay: Duration::ZERO,
            ranking_delay: Duration::ZERO,
            ..Settings::default()
        }
    }

    fn providers() -> ProviderManager {
        let mut providers = ProviderManager::new();
        providers.register_provider(Box::new(StaticProvider(Platform::Android)));
        providers.register_provider(Box::new(StaticProvider(Platform::Ios)));
        providers
    }

    fn config() -> AppsConfig {
        AppsConfig {
            apps: vec![TrackedApp {
                id: "one".to_string(),
                name: "One".to_string(),
                play_store_id: Some("app.one".to_string()),
                app_store_id: Some("app.one".to_string()),
            }],
        }
    }

    #[tokio::test]
    async fn test_run_writes_snapshot() {
        let dir = TempDir::new().unwrap();
        let pipeline = Pipeline::with_providers(settings(&dir), providers());

        let snapshot = pipeline.run(&config()).await.unwrap();
        assert_eq!(snapshot.total_apps, 1);
        assert_eq!(snapshot.feed.len(), 2);
        assert_eq!(snapshot.metadata.successful_apps, 1);
        assert_eq!(snapshot.app_icons["one"], "https://icons.example/ios.png");
        assert_eq!(snapshot.rankings.android["one"], 2);
        assert_eq!(snapshot.rankings.ios["one"], 2);

        let written = std::fs::read_to_string(pipeline.store().path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["totalApps"], 1);
        assert!(value["metadata"].get("error").is_none());
    }

    #[tokio::test]
    async fn test_skip_rankings() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            rankings: Vec::new(),
            ..settings(&dir)
        };
        let pipeline = Pipeline::with_providers(settings, providers());

        let snapshot = pipeline.run(&config()).await.unwrap();
        assert!(snapshot.rankings.android.is_empty());
        assert!(snapshot.rankings.ios.is_empty());
    }
}
