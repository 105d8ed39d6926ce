//! Usage statistics handler.

use std::fmt::Write;

use owo_colors::OwoColorize;

use casi_core::{Controller, FileStore, StatsReport};

use crate::cli::RangeArgs;
use crate::error::CliError;
use crate::output;

use super::{RenderCtx, util};

pub async fn handle(
    controller: &Controller<FileStore>,
    args: &RangeArgs,
    ctx: &RenderCtx,
) -> Result<(), CliError> {
    let range = util::parse_range(args.from.as_deref(), args.to.as_deref())?;

    let spinner = util::fetch_spinner(ctx.quiet, "computing stats...");
    let result = controller.stats(range).await;
    util::finish_spinner(spinner);
    let report = result?;

    let colored = output::should_color(&ctx.color);
    let rendered = output::render_single(
        &ctx.output,
        &report,
        |r| detail(r, colored),
        |r| format!("{:.1}", r.totals.distance_in_km),
    );
    output::print_output(&rendered, ctx.quiet);
    Ok(())
}

/// Key/value detail view for the default table output.
fn detail(report: &StatsReport, colored: bool) -> String {
    let heading = |text: &str| {
        if colored {
            text.bold().to_string()
        } else {
            text.to_owned()
        }
    };

    let totals = &report.totals;
    let remaining = &report.remaining;
    let costs = &report.prospective_costs;

    let mut out = String::new();
    let _ = writeln!(out, "{}", heading("Totals"));
    let _ = writeln!(out, "  cruises:     {}", totals.cruse);
    let _ = writeln!(out, "  distance:    {:.1} km", totals.distance_in_km);
    let _ = writeln!(out, "  hours:       {:.1}", totals.hours);
    let _ = writeln!(out, "  first start: {}", totals.first_date);
    let _ = writeln!(out, "  last start:  {}", totals.last_date);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading("Remaining allowance"));
    let _ = writeln!(out, "  km:          {:.1}", remaining.km);
    let _ = writeln!(out, "  hours:       {:.1}", remaining.hours);
    let _ = writeln!(out, "  km/hour:     {:.2}", remaining.total_km_per_hour);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading("Prospective costs"));
    let _ = writeln!(
        out,
        "  by km:       {:.2} {}",
        costs.total_costs_by_remaining_km, costs.cost_unit
    );
    let _ = writeln!(
        out,
        "  by hours:    {:.2} {}",
        costs.total_costs_by_remaining_hours, costs.cost_unit
    );
    let _ = writeln!(out, "  max:         {:.2} {}", costs.total_max, costs.cost_unit);
    let _ = write!(out, "  min:         {:.2} {}", costs.total_min, costs.cost_unit);
    out
}
