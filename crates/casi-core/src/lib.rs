// casi-core: Cache-reconciling service layer between casi-api and the CLI.

pub mod config;
pub mod controller;
pub mod error;
pub mod service;
pub mod snapshot;
pub mod stats;
pub mod time;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ServiceConfig;
pub use controller::{Controller, StatsReport};
pub use error::CoreError;
pub use service::{BookingService, FetchOptions};
pub use snapshot::{FileStore, MemoryStore, SnapshotKey, SnapshotStore};
pub use stats::{ProspectiveCosts, Remaining, Totals};
pub use time::{DateRange, Elapsed, ElapsedUnit};

// Re-export the API types consumers handle directly.
pub use casi_api::client::DEFAULT_BASE_URL;
pub use casi_api::{Booking, Credentials, TimeRange};
