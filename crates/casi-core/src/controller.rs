// ── Controller façade ──
//
// Thin pass-through between the interactive shell and the service. Exists
// so the shell never touches service internals; it holds no logic of its
// own and adds no error handling -- everything propagates.

use serde::Serialize;

use casi_api::{Booking, Credentials};

use crate::error::CoreError;
use crate::service::{BookingService, FetchOptions};
use crate::snapshot::SnapshotStore;
use crate::stats::{ProspectiveCosts, Remaining, Totals};
use crate::time::DateRange;

/// Everything `stats` returns, ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub totals: Totals,
    pub remaining: Remaining,
    pub prospective_costs: ProspectiveCosts,
}

/// The entry point for shell consumers.
pub struct Controller<S> {
    service: BookingService<S>,
}

impl<S: SnapshotStore> Controller<S> {
    pub fn new(service: BookingService<S>) -> Self {
        Self { service }
    }

    /// Set (or replace) the session credentials.
    pub fn login(&self, credentials: Credentials) {
        self.service.login(credentials);
    }

    /// Whether credentials are already in place.
    pub fn has_credentials(&self) -> bool {
        self.service.client().has_credentials()
    }

    /// Bookings for `range` (cache-first).
    pub async fn data(&self, range: Option<DateRange>) -> Result<Vec<Booking>, CoreError> {
        self.service
            .data_from_cache(FetchOptions {
                force_refresh: false,
                date_range: range,
            })
            .await
    }

    /// Bookings for `range`, bypassing cache reads.
    pub async fn refreshed(&self, range: Option<DateRange>) -> Result<Vec<Booking>, CoreError> {
        self.service.refreshed_data(range).await
    }

    /// Totals, remaining allowance and projected costs in one shot.
    pub async fn stats(&self, range: Option<DateRange>) -> Result<StatsReport, CoreError> {
        let totals = self.service.totals(range).await?;
        let remaining = self.service.remaining(&totals);
        let prospective_costs = self.service.prospective_costs(&remaining);
        Ok(StatsReport {
            totals,
            remaining,
            prospective_costs,
        })
    }
}
