//! Booking listing handlers (`data`, `refresh`).

use tabled::Tabled;

use casi_core::{Booking, Controller, FileStore};

use crate::cli::{OutputFormat, RangeArgs};
use crate::error::CliError;
use crate::output;

use super::{RenderCtx, util};

/// Table row for a booking.
#[derive(Tabled)]
pub struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "KM")]
    km: String,
    #[tabled(rename = "State")]
    state: String,
}

fn to_row(booking: &Booking) -> BookingRow {
    BookingRow {
        id: booking.id.clone(),
        start: booking.time_range.start.clone(),
        end: booking.time_range.end.clone(),
        km: format!("{:.1}", booking.distance / 1000.0),
        state: if booking.cancelled {
            "cancelled".into()
        } else {
            booking.billing_state.clone().unwrap_or_default()
        },
    }
}

pub async fn handle(
    controller: &Controller<FileStore>,
    args: &RangeArgs,
    refresh: bool,
    ctx: &RenderCtx,
) -> Result<(), CliError> {
    let range = util::parse_range(args.from.as_deref(), args.to.as_deref())?;

    let spinner = util::fetch_spinner(
        ctx.quiet,
        if refresh {
            "refreshing bookings..."
        } else {
            "loading bookings..."
        },
    );
    let result = if refresh {
        controller.refreshed(range).await
    } else {
        controller.data(range).await
    };
    util::finish_spinner(spinner);
    let bookings = result?;

    let rendered = output::render_list(&ctx.output, &bookings, to_row, |b| b.id.clone());
    output::print_output(&rendered, ctx.quiet);
    if ctx.output == OutputFormat::Table {
        output::print_output(&format!("{} bookings", bookings.len()), ctx.quiet);
    }
    Ok(())
}
