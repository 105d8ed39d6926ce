// Cache-reconciling booking service
//
// Decides whether a request is satisfiable from a local snapshot (exact or
// superset range) or must hit the remote client, and folds raw booking
// records into the aggregate statistics.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use casi_api::{Booking, BookingClient, Credentials, TimeRange};

use crate::error::CoreError;
use crate::snapshot::{SnapshotKey, SnapshotStore};
use crate::stats::{self, ProspectiveCosts, Remaining, Totals};
use crate::time::{self, DateRange, ElapsedUnit};

/// Options for [`BookingService::data_from_cache`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Bypass cache reads; the fetched result is still written back.
    pub force_refresh: bool,
    /// Target range; the client's maximum window when absent.
    pub date_range: Option<DateRange>,
}

/// Service between the controller and the remote client. Owns the snapshot
/// store; the client owns the session.
pub struct BookingService<S> {
    client: BookingClient,
    store: S,
}

impl<S: SnapshotStore> BookingService<S> {
    pub fn new(client: BookingClient, store: S) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &BookingClient {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Set (or replace) the credentials used for the next login.
    pub fn login(&self, credentials: Credentials) {
        self.client.set_credentials(credentials);
    }

    // ── Data access ──────────────────────────────────────────────────

    /// Serve bookings from a local snapshot when possible.
    ///
    /// A hit never reaches the remote client. A miss triggers exactly one
    /// fetch and one snapshot write. `force_refresh` skips the read but
    /// still writes the result afterwards (refresh-and-replace).
    pub async fn data_from_cache(&self, options: FetchOptions) -> Result<Vec<Booking>, CoreError> {
        let target = options
            .date_range
            .map_or_else(BookingClient::max_range, DateRange::to_time_range);
        let key_max = SnapshotKey::for_range(&BookingClient::max_range());
        let key_target = SnapshotKey::for_range(&target);

        let cached = if options.force_refresh {
            Vec::new()
        } else {
            self.cached_in_range(&target, &key_max, &key_target)
        };
        if !cached.is_empty() {
            debug!(records = cached.len(), "serving bookings from cache");
            return Ok(cached);
        }

        let data = self.client.bookings(target, false).await?;
        // The raw, unfiltered result is what gets cached. An empty result
        // is indistinguishable from "no cache" on replay, so an empty
        // range refetches every time.
        self.store.write(&key_target, &data)?;
        Ok(data)
    }

    /// Force-refreshed equivalent of [`data_from_cache`](Self::data_from_cache).
    pub async fn refreshed_data(&self, range: Option<DateRange>) -> Result<Vec<Booking>, CoreError> {
        self.data_from_cache(FetchOptions {
            force_refresh: true,
            date_range: range,
        })
        .await
    }

    /// Records from the preferred existing snapshot that fall entirely
    /// within `target`, both bounds inclusive. Empty when no snapshot
    /// exists, none qualify, or the snapshot is unreadable.
    fn cached_in_range(
        &self,
        target: &TimeRange,
        key_max: &SnapshotKey,
        key_target: &SnapshotKey,
    ) -> Vec<Booking> {
        let snapshot = match self.read_preferred(key_max, key_target) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "unreadable cache snapshot, falling back to remote");
                None
            }
        };
        let Some(records) = snapshot else {
            return Vec::new();
        };

        records
            .into_iter()
            .filter(|booking| {
                booking
                    .time_range
                    .parse()
                    .is_some_and(|range| target.contains(&range))
            })
            .collect()
    }

    fn read_preferred(
        &self,
        key_max: &SnapshotKey,
        key_target: &SnapshotKey,
    ) -> Result<Option<Vec<Booking>>, CoreError> {
        // The range-specific snapshot wins over the max-window one.
        if let Some(records) = self.store.read(key_target)? {
            return Ok(Some(records));
        }
        self.store.read(key_max)
    }

    // ── Statistics ───────────────────────────────────────────────────

    /// Fold the range's non-cancelled bookings into aggregate totals.
    pub async fn totals(&self, range: Option<DateRange>) -> Result<Totals, CoreError> {
        let data = self
            .data_from_cache(FetchOptions {
                force_refresh: false,
                date_range: range,
            })
            .await?;
        Ok(compute_totals(&data))
    }

    /// Allowance left against the plan limits.
    pub fn remaining(&self, totals: &Totals) -> Remaining {
        stats::remaining(totals)
    }

    /// Projected costs for the remaining allowance.
    pub fn prospective_costs(&self, remaining: &Remaining) -> ProspectiveCosts {
        stats::prospective_costs(remaining)
    }
}

/// Aggregate non-cancelled records. Both date trackers follow booking
/// *starts*; the last booking's own span only contributes to `hours`.
fn compute_totals(records: &[Booking]) -> Totals {
    let mut first = Utc::now();
    let mut last = DateTime::<Utc>::UNIX_EPOCH;
    let mut distance_in_meter = 0.0;
    let mut cruse = 0u64;
    let mut hours = 0.0;

    for booking in records {
        if booking.cancelled {
            warn!(id = %booking.id, "skipping cancelled cruise");
            continue;
        }
        let Some(range) = booking.time_range.parse() else {
            warn!(id = %booking.id, "skipping booking with unreadable time range");
            continue;
        };

        cruse += 1;
        distance_in_meter += booking.distance;
        first = first.min(range.start);
        last = last.max(range.start);
        hours += time::duration(range.start, range.end, ElapsedUnit::Hour).value;
    }

    Totals {
        distance_in_meter,
        distance_in_km: distance_in_meter / 1000.0,
        cruse,
        first_date: time::iso_timestamp(first),
        last_date: time::iso_timestamp(last),
        hours,
        total_duration: time::duration(first, last, ElapsedUnit::Hour),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn booking(id: &str, start: &str, end: &str, distance: f64, cancelled: bool) -> Booking {
        serde_json::from_value(json!({
            "id": id,
            "timeRange": { "start": start, "end": end },
            "distance": distance,
            "cancelled": cancelled,
        }))
        .expect("valid booking")
    }

    #[test]
    fn totals_skip_cancelled_records() {
        let records = vec![
            booking("b-1", "2024-03-01T10:00:00Z", "2024-03-01T12:00:00Z", 1000.0, false),
            booking("b-2", "2024-03-05T08:00:00Z", "2024-03-05T09:30:00Z", 2000.0, false),
            booking("b-3", "2024-03-09T18:00:00Z", "2024-03-09T20:00:00Z", 500.0, false),
            booking("b-4", "2024-03-10T10:00:00Z", "2024-03-10T11:00:00Z", 9999.0, true),
        ];

        let totals = compute_totals(&records);

        assert_eq!(totals.cruse, 3);
        assert_eq!(totals.distance_in_meter, 3500.0);
        assert_eq!(totals.distance_in_km, 3.5);
        assert_eq!(totals.hours, 2.0 + 1.5 + 2.0);
        assert_eq!(totals.first_date, "2024-03-01T10:00:00.000Z");
        // Tracked on starts: the last booking's end does not move it.
        assert_eq!(totals.last_date, "2024-03-09T18:00:00.000Z");
    }

    #[test]
    fn total_duration_spans_first_to_last_start() {
        let records = vec![
            booking("b-1", "2024-03-01T10:00:00Z", "2024-03-01T11:00:00Z", 100.0, false),
            booking("b-2", "2024-03-02T10:00:00Z", "2024-03-02T11:00:00Z", 100.0, false),
        ];

        let totals = compute_totals(&records);
        assert_eq!(totals.total_duration.value, 24.0);
    }

    #[test]
    fn unreadable_time_ranges_are_skipped() {
        let records = vec![
            booking("b-1", "2024-03-01T10:00:00Z", "2024-03-01T11:00:00Z", 100.0, false),
            booking("b-2", "garbage", "2024-03-02T11:00:00Z", 900.0, false),
        ];

        let totals = compute_totals(&records);
        assert_eq!(totals.cruse, 1);
        assert_eq!(totals.distance_in_meter, 100.0);
    }
}
