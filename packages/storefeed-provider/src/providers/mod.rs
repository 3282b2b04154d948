//! Store clients. Each one implements `StoreProvider` for a single platform
//! and is registered with `ProviderManager::with_defaults`.

pub mod app_store;
pub mod google_play;

pub use app_store::AppStoreProvider;
pub use google_play::GooglePlayProvider;
