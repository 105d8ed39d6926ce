// Booking API response types
//
// Models for the CASIREST JSON API. Booking fields use `#[serde(default)]`
// liberally because the API is inconsistent about field presence across
// booking states, and a `flatten` catch-all keeps unknown fields intact
// through a cache round-trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── Session token ────────────────────────────────────────────────────

/// A validated session token from `POST /tokens`.
///
/// The `id`/`customer_id` pair doubles as the HTTP Basic credentials for
/// booking queries. Never persisted; lost on process exit.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub id: String,
    pub customer_id: String,
    pub expiry: DateTime<Utc>,
    pub timeout: Option<DateTime<Utc>>,
}

impl SessionToken {
    /// Whether the token is still usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }
}

/// Raw token payload. Every field is optional so that a malformed response
/// surfaces as an authentication error rather than a serde error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timeout: Option<DateTime<Utc>>,
}

impl TokenResponse {
    pub(crate) fn into_token(self) -> Result<SessionToken, Error> {
        let (Some(id), Some(customer_id), Some(expiry)) = (self.id, self.customer_id, self.expiry)
        else {
            return Err(Error::Authentication {
                message: "malformed token payload: missing id, customerId or expiry".into(),
            });
        };
        Ok(SessionToken {
            id,
            customer_id,
            expiry,
            timeout: self.timeout,
        })
    }
}

// ── Time range ───────────────────────────────────────────────────────

/// Closed query window, used both as a request parameter and (at calendar
/// date granularity) as a cache key upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `true` when `other` lies entirely within this range, both bounds
    /// inclusive.
    pub fn contains(&self, other: &TimeRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

// ── Booking ──────────────────────────────────────────────────────────

/// Time range of a booking as delivered by the API: ISO-8601 strings.
///
/// Kept as strings so records survive a cache round-trip byte-for-byte;
/// [`parse`](Self::parse) produces the typed range on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingTimeRange {
    pub start: String,
    pub end: String,
}

impl BookingTimeRange {
    /// Parse both bounds; `None` when either is not valid ISO-8601.
    pub fn parse(&self) -> Option<TimeRange> {
        let start = DateTime::parse_from_rfc3339(&self.start)
            .ok()?
            .with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339(&self.end)
            .ok()?
            .with_timezone(&Utc);
        Some(TimeRange { start, end })
    }
}

/// A single reservation record ("cruise") from `GET /bookings`.
///
/// Immutable once fetched -- the client only filters and aggregates.
/// Fields beyond the interpreted set ride along in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    #[serde(default)]
    pub prov_id: Option<String>,
    pub time_range: BookingTimeRange,
    #[serde(default)]
    pub bookee_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub booking_types: Vec<serde_json::Value>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub add_props: Option<serde_json::Value>,
    #[serde(default)]
    pub changeable: bool,
    #[serde(default)]
    pub cancelled: bool,
    /// `DELIVERED` / `NOT_DELIVERED` -- kept as a string, the client does
    /// not interpret it.
    #[serde(default)]
    pub billing_state: Option<String>,
    /// Driven distance in meters.
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub entrances: Option<serde_json::Value>,
    #[serde(default)]
    pub ride_share_allowed: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
