use storefeed_config::Platform;
use storefeed_utils::BoxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("InvalidUrl `{url}`: {source}")]
    InvalidUrl {
        url: String,
        source: hyper::http::uri::InvalidUri,
    },

    #[error("Request `{url}`: {source}")]
    Request { url: String, source: BoxError },

    #[error("Status {status} from `{url}`")]
    Status { url: String, status: u16 },

    #[error("App `{store_id}` not found")]
    AppNotFound { store_id: String },

    #[error("DeserializeResponseBody `{url}`: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    #[error("Missing {what} in response from `{url}`")]
    MissingData { url: String, what: &'static str },

    #[error("No provider registered for {platform}")]
    NotRegistered { platform: Platform },
}
