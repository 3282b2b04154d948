//! Store metadata feed.
//!
//! Polls Google Play and the App Store for a roster of tracked apps, folds
//! every observed version into a historical feed and writes one JSON snapshot
//! per run for a dashboard to read.

pub use storefeed_config as config;
pub use storefeed_provider as provider;

pub use storefeed_config::{AppsConfig, Platform, Settings, TrackedApp};
pub use storefeed_core::{Pipeline, RunError, Snapshot, SnapshotStore};
pub use storefeed_provider::{PlatformRecord, ProviderManager, StoreProvider};
