use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("CreateOutputDir `{}`: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("WriteSnapshot `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("SerializeSnapshot: {source}")]
    Serialize { source: serde_json::Error },
}

/// Anything that aborts a pipeline run. Store failures never do; they are
/// logged and the affected app or chart is left empty.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("SaveSnapshot: {source}")]
    Save {
        #[from]
        source: SnapshotError,
    },
}
