//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use chrono::NaiveDate;
use indicatif::ProgressBar;

use casi_core::DateRange;

use crate::error::CliError;

/// Parse `--from`/`--to` into a date range. Both bounds together, or
/// neither (the service's trailing 12-month window).
pub fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<Option<DateRange>, CliError> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => {
            let start = parse_date(from, "from")?;
            let end = parse_date(to, "to")?;
            if start > end {
                return Err(CliError::Validation {
                    field: "from".into(),
                    reason: "start must be on or before end".into(),
                });
            }
            Ok(Some(DateRange::new(start, end)))
        }
        _ => Err(CliError::Validation {
            field: "range".into(),
            reason: "--from and --to must be given together".into(),
        }),
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("invalid date '{value}' (use YYYY-MM-DD)"),
    })
}

/// Spinner shown while a remote fetch may be in flight. `None` when quiet
/// or not attached to a terminal.
pub fn fetch_spinner(quiet: bool, message: &str) -> Option<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner().with_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

pub fn finish_spinner(bar: Option<ProgressBar>) {
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
}
