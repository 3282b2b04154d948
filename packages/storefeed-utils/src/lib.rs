pub mod http;
pub mod time;

// Re-export main utilities
pub use http::{get, http_get, http_status_is_ok, https_get, BoxError, ResponseData};
pub use time::{normalize_date, parse_store_date, today_utc};
