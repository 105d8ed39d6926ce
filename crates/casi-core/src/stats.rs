// Derived statistics: totals, remaining allowance, projected costs.
//
// Plan limits and tariff follow the operator's mid-class yearly package:
// 3600 km and 360 hours included, 0.29 EUR/km and 2.60 EUR/hour.
// Everything here is pure arithmetic over already-fetched records.

use serde::{Deserialize, Serialize};

use crate::time::Elapsed;

/// Yearly distance allowance in kilometers.
pub const ALLOWANCE_KM: f64 = 3600.0;
/// Yearly usage allowance in hours.
pub const ALLOWANCE_HOURS: f64 = 360.0;
/// Mid-class tariff per kilometer, EUR.
pub const MID_CLASS_PER_KM: f64 = 0.29;
/// Mid-class tariff per hour, EUR.
pub const MID_CLASS_PER_HOUR: f64 = 2.6;

/// Aggregate over the non-cancelled bookings of a range.
///
/// Field names mirror the JSON shape this tool has always emitted,
/// including the historical `cruse` spelling of the booking count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub distance_in_meter: f64,
    #[serde(rename = "distanceInKM")]
    pub distance_in_km: f64,
    pub cruse: u64,
    pub first_date: String,
    pub last_date: String,
    pub hours: f64,
    pub total_duration: Elapsed,
}

/// Allowance left against the plan limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remaining {
    pub km: f64,
    pub hours: f64,
    /// Observed km per booked hour. Non-finite when the observed duration
    /// is zero; callers render it as-is.
    pub total_km_per_hour: f64,
}

/// Projected costs for consuming the remaining allowance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectiveCosts {
    pub cost_unit: String,
    pub total_costs_by_remaining_km: f64,
    pub total_costs_by_remaining_hours: f64,
    /// Full-rate projection: remaining km and hours each billed separately.
    pub total_max: f64,
    /// Blended projection: remaining hours driven at the observed km/h ratio.
    pub total_min: f64,
}

/// Fixed-allowance subtraction against the plan limits.
pub fn remaining(totals: &Totals) -> Remaining {
    Remaining {
        km: ALLOWANCE_KM - totals.distance_in_km,
        hours: ALLOWANCE_HOURS - totals.hours,
        total_km_per_hour: totals.distance_in_km / totals.total_duration.value,
    }
}

/// Apply the mid-class tariff to the remaining allowance.
pub fn prospective_costs(remaining: &Remaining) -> ProspectiveCosts {
    let km = remaining.km * MID_CLASS_PER_KM;
    let hours = remaining.hours * MID_CLASS_PER_HOUR;
    ProspectiveCosts {
        cost_unit: "EUR".into(),
        total_costs_by_remaining_km: km,
        total_costs_by_remaining_hours: hours,
        total_max: km + hours,
        total_min: remaining.hours
            * remaining.total_km_per_hour
            * (MID_CLASS_PER_KM + MID_CLASS_PER_HOUR),
    }
}
