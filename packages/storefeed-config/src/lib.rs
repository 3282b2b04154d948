pub mod apps_config;
pub mod error;
pub mod platform;
pub mod settings;

// Re-export commonly used types
pub use apps_config::{AppsConfig, TrackedApp};
pub use error::ConfigError;
pub use platform::Platform;
pub use settings::{RankingTarget, Settings, StoreOptions};
