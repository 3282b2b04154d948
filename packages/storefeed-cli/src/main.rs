mod trace;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use storefeed_config::settings::{
    DEFAULT_CONFIG_PATH, DEFAULT_COUNTRY, DEFAULT_LANGUAGE, DEFAULT_OUTPUT_PATH,
    DEFAULT_RANKING_DELAY_MS, DEFAULT_REQUEST_DELAY_MS, DEFAULT_TOP_LIST_SIZE,
};
use storefeed_config::{AppsConfig, Platform, RankingTarget, Settings, StoreOptions};
use storefeed_core::{Pipeline, RunError, Snapshot, SnapshotStore};

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "storefeed")]
#[command(about = "Collect Google Play and App Store metadata into a JSON snapshot")]
struct Cli {
    /// Tracked apps file
    #[arg(long, env = "STOREFEED_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Snapshot file, read as history and overwritten
    #[arg(long, env = "STOREFEED_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Pause after each app lookup
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY_MS)]
    request_delay_ms: u64,

    /// Pause between top-list lookups
    #[arg(long, default_value_t = DEFAULT_RANKING_DELAY_MS)]
    ranking_delay_ms: u64,

    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,

    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    #[arg(long, default_value_t = DEFAULT_TOP_LIST_SIZE)]
    top_list_size: usize,

    #[arg(long, default_value = "TOOLS")]
    android_category: String,

    #[arg(long, default_value = "topselling_free")]
    android_collection: String,

    /// App Store genre id (6002 is Utilities)
    #[arg(long, default_value = "6002")]
    ios_category: String,

    #[arg(long, default_value = "topfreeapplications")]
    ios_collection: String,

    /// Do not fetch category top lists
    #[arg(long)]
    skip_rankings: bool,

    /// URL rewrite rules, one `prefix -> replacement` per line
    #[arg(long, env = "STOREFEED_REVERSE_PROXY")]
    reverse_proxy: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn settings(&self) -> Settings {
        let rankings = if self.skip_rankings {
            Vec::new()
        } else {
            vec![
                RankingTarget::new(
                    Platform::Android,
                    &self.android_collection,
                    &self.android_category,
                ),
                RankingTarget::new(Platform::Ios, &self.ios_collection, &self.ios_category),
            ]
        };
        Settings {
            config_path: self.config.clone(),
            output_path: self.output.clone(),
            request_delay: Duration::from_millis(self.request_delay_ms),
            ranking_delay: Duration::from_millis(self.ranking_delay_ms),
            top_list_size: self.top_list_size,
            rankings,
            store: StoreOptions {
                country: self.country.clone(),
                language: self.language.clone(),
                reverse_proxy: self.reverse_proxy.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = trace::init(&cli.log_level) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    let settings = cli.settings();

    let config = match AppsConfig::load(&settings.config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ExitCode::from(execute(&Pipeline::new(settings), &config).await)
}

async fn execute(pipeline: &Pipeline, config: &AppsConfig) -> u8 {
    let result = pipeline.run(config).await;
    finish(result, pipeline.store())
}

/// Exit status for a finished run. A failed run leaves the empty fallback
/// snapshot behind when it can still be written.
fn finish(result: Result<Snapshot, RunError>, store: &SnapshotStore) -> u8 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            match store.save(&Snapshot::fallback(&e, chrono::Utc::now())) {
                Ok(()) => tracing::info!(
                    path = %store.path().display(),
                    "Fallback snapshot written"
                ),
                Err(e) => tracing::error!("Failed to write fallback snapshot: {}", e),
            }
            EXIT_FAILURE
        }
    }
}
