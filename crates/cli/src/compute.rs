use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use mnovis_traffic::downtime;
use mnovis_traffic::periods;
use mnovis_traffic::read;

use crate::cli::DowntimeArgs;
use crate::cli::PeriodsArgs;
use crate::error::CliError;

pub(crate) fn downtime(args: DowntimeArgs) -> Result<(), CliError> {
    info!(path = %args.input.display(), "loading the raw message export");
    let messages = read::raw_messages(&args.input)?;
    info!(count = messages.len(), "loaded messages");

    let direction = args.direction.direction();
    let windows = downtime::windows(
        &messages,
        &args.operator,
        direction,
        args.start_date,
        args.end_date,
    );

    let direction = direction.to_string();
    let rows: Vec<DowntimeRow> = windows
        .iter()
        .map(|window| DowntimeRow {
            operator: &args.operator,
            message_direction: &direction,
            previous_message_timestamp: window.start.to_rfc3339(),
            next_message_timestamp: window.end.to_rfc3339(),
            down_time_duration_seconds: window.duration_seconds,
        })
        .collect();

    write_json(&args.output, &rows)?;
    info!(count = rows.len(), path = %args.output.display(), "wrote the windows of downtime");

    Ok(())
}

pub(crate) fn periods(args: PeriodsArgs) -> Result<(), CliError> {
    info!(path = %args.input.display(), "loading the raw message export");
    let messages = read::raw_messages(&args.input)?;
    info!(count = messages.len(), "loaded messages");

    let direction = args.direction.direction();
    let bounds = periods::bounds(args.start_date, args.end_date, args.period);
    let records = periods::messages_per_period(&messages, &args.operator, direction, &bounds);
    let differences = periods::differences(&records);

    let direction = direction.to_string();
    let period_rows: Vec<PeriodRow> = records
        .iter()
        .map(|record| PeriodRow {
            operator: &args.operator,
            message_direction: &direction,
            period_start: record.period_start.to_rfc3339(),
            period_end: record.period_end.to_rfc3339(),
            number_of_messages: record.count,
        })
        .collect();

    // Each difference row spans two consecutive periods; the bound they
    // share is the `PeriodBetween` stamp.
    let difference_rows: Vec<DifferenceRow> = records
        .windows(2)
        .zip(&differences)
        .map(|(pair, difference)| DifferenceRow {
            operator: &args.operator,
            message_direction: &direction,
            period_start: pair[0].period_start.to_rfc3339(),
            period_between: pair[0].period_end.to_rfc3339(),
            period_end: pair[1].period_end.to_rfc3339(),
            message_difference: difference.delta,
        })
        .collect();

    write_json(&args.output, &period_rows)?;
    info!(count = period_rows.len(), path = %args.output.display(), "wrote the messages per period");

    write_json(&args.differences_output, &difference_rows)?;
    info!(
        count = difference_rows.len(),
        path = %args.differences_output.display(),
        "wrote the per-period message differences"
    );

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), CliError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer(&mut writer, rows)?;
    writer.flush()?;

    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DowntimeRow<'a> {
    operator: &'a str,
    message_direction: &'a str,
    previous_message_timestamp: String,
    next_message_timestamp: String,
    down_time_duration_seconds: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PeriodRow<'a> {
    operator: &'a str,
    message_direction: &'a str,
    period_start: String,
    period_end: String,
    number_of_messages: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DifferenceRow<'a> {
    operator: &'a str,
    message_direction: &'a str,
    period_start: String,
    period_between: String,
    period_end: String,
    message_difference: f64,
}
