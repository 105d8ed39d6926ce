// Shared transport configuration for building the reqwest::Client.
//
// The bookings endpoint can be slow when a full 12-month window is queried,
// so the timeout is configurable; the default matches what the service's
// own frontend uses.

use std::time::Duration;

use crate::error::Error;

/// Default request timeout for the booking service.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("casi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)
    }
}
