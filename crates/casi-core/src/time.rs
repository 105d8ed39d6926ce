// Date and duration helpers shared across the service layer.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use casi_api::TimeRange;

/// Unit of an [`Elapsed`] measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElapsedUnit {
    Hour,
    Ms,
}

/// Elapsed time between two instants, in the requested unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Elapsed {
    pub value: f64,
    pub unit: ElapsedUnit,
}

/// Absolute distance between two instants.
#[allow(clippy::cast_precision_loss)]
pub fn duration(t1: DateTime<Utc>, t2: DateTime<Utc>, unit: ElapsedUnit) -> Elapsed {
    let ms = (t2 - t1).num_milliseconds().abs() as f64;
    match unit {
        ElapsedUnit::Hour => Elapsed {
            value: ms / 3_600_000.0,
            unit,
        },
        ElapsedUnit::Ms => Elapsed { value: ms, unit },
    }
}

/// Calendar date of `ts`, ISO formatted (`YYYY-MM-DD`).
pub fn iso_date(ts: DateTime<Utc>) -> String {
    ts.date_naive().to_string()
}

/// Full ISO-8601 timestamp with milliseconds, as the remote API emits.
pub fn iso_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar-date range as supplied by the shell (`YYYY-MM-DD` bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Expand to a concrete window: midnight UTC on both bounds.
    pub fn to_time_range(self) -> TimeRange {
        TimeRange::new(midnight(self.start), midnight(self.end))
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn duration_in_hours() {
        let elapsed = duration(ts(10, 0), ts(12, 30), ElapsedUnit::Hour);
        assert_eq!(elapsed.value, 2.5);
        assert_eq!(elapsed.unit, ElapsedUnit::Hour);
    }

    #[test]
    fn duration_is_symmetric() {
        let forward = duration(ts(10, 0), ts(12, 0), ElapsedUnit::Ms);
        let backward = duration(ts(12, 0), ts(10, 0), ElapsedUnit::Ms);
        assert_eq!(forward.value, backward.value);
        assert_eq!(forward.value, 7_200_000.0);
    }

    #[test]
    fn iso_date_drops_the_time_part() {
        assert_eq!(iso_date(ts(23, 59)), "2024-03-01");
    }

    #[test]
    fn date_range_expands_to_midnight_bounds() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date"),
        )
        .to_time_range();

        assert_eq!(iso_timestamp(range.start), "2024-03-01T00:00:00.000Z");
        assert_eq!(iso_timestamp(range.end), "2024-03-15T00:00:00.000Z");
    }
}
