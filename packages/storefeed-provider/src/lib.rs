pub mod base_provider;
pub mod data;
pub mod error;
pub mod providers;

// Re-export common types
pub use base_provider::{fetch_text, StoreProvider, StoreProviderExt, USER_AGENT};
pub use data::{Downloads, PlatformRecord, TopListQuery, NO_UPDATE_NOTES};
pub use error::ProviderError;
pub use providers::{AppStoreProvider, GooglePlayProvider};

use std::collections::HashMap;

use storefeed_config::{Platform, StoreOptions};

/// Store clients keyed by the platform they serve.
pub struct ProviderManager {
    providers: HashMap<Platform, Box<dyn StoreProvider>>,
}

impl Default for ProviderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderManager {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Google Play for Android and the App Store for iOS.
    pub fn with_defaults(options: &StoreOptions) -> Self {
        let mut manager = Self::new();
        manager.register_provider(Box::new(GooglePlayProvider::new(options.clone())));
        manager.register_provider(Box::new(AppStoreProvider::new(options.clone())));
        manager
    }

    /// Registering a second provider for a platform replaces the first.
    pub fn register_provider(&mut self, provider: Box<dyn StoreProvider>) {
        self.providers.insert(provider.platform(), provider);
    }

    pub fn get_provider(&self, platform: Platform) -> Option<&dyn StoreProvider> {
        self.providers.get(&platform).map(|p| p.as_ref())
    }

    pub async fn get_app_info(
        &self,
        platform: Platform,
        store_id: &str,
    ) -> Result<PlatformRecord, ProviderError> {
        match self.get_provider(platform) {
            Some(provider) => provider.get_app_info(store_id).await,
            None => Err(ProviderError::NotRegistered { platform }),
        }
    }

    pub async fn get_top_list(
        &self,
        platform: Platform,
        query: &TopListQuery,
    ) -> Result<Vec<String>, ProviderError> {
        match self.get_provider(platform) {
            Some(provider) => provider.get_top_list(query).await,
            None => Err(ProviderError::NotRegistered { platform }),
        }
    }
}
