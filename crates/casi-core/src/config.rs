// ── Runtime service configuration ──
//
// Describes how to reach the booking service and where snapshots live.
// Carries credential data and tuning but never touches disk or the
// environment itself -- the CLI constructs a `ServiceConfig` and hands
// it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use casi_api::client::DEFAULT_BASE_URL;
use casi_api::transport::{DEFAULT_TIMEOUT, TransportConfig};
use casi_api::{BookingClient, Credentials};

use crate::error::CoreError;
use crate::service::BookingService;
use crate::snapshot::FileStore;

/// Configuration for one service session.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Booking service base URL.
    pub base_url: Url,
    /// Credentials, when already known; otherwise supplied later via login.
    pub credentials: Option<Credentials>,
    /// Request timeout.
    pub timeout: Duration,
    /// Directory for cache snapshots.
    pub cache_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL
                .parse()
                .expect("default base URL is valid"),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            cache_dir: PathBuf::from("cache"),
        }
    }
}

impl ServiceConfig {
    /// Build a client + file-store service from this config.
    pub fn into_service(self) -> Result<BookingService<FileStore>, CoreError> {
        let transport = TransportConfig {
            timeout: self.timeout,
        };
        let client = BookingClient::new(self.base_url, self.credentials, &transport)?;
        Ok(BookingService::new(client, FileStore::new(self.cache_dir)))
    }
}
