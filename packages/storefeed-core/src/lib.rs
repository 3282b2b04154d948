pub mod aggregate;
pub mod app_data;
pub mod error;
pub mod feed;
pub mod fetcher;
pub mod pipeline;
pub mod rankings;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod test_support;

// Re-export the pipeline surface
pub use aggregate::{
    build_iap_summary, build_icon_map, compute_stats, AndroidPricing, IapEntry, IosPricing, Stats,
};
pub use app_data::AppData;
pub use error::{RunError, SnapshotError};
pub use feed::{merge_feed, FeedEntry, FeedKey, MergeOutcome, UNKNOWN_VERSION};
pub use fetcher::Fetcher;
pub use pipeline::Pipeline;
pub use rankings::{match_rankings, RankingCollector, Rankings};
pub use snapshot::{Metadata, Snapshot};
pub use store::SnapshotStore;
