use std::fs;
use std::fs::OpenOptions;
use std::path::Path;

use chrono::DateTime;
use chrono::Utc;
use tracing::warn;

use mnovis_traffic::locate::locate_nearest;
use mnovis_traffic::records::DifferenceRecord;
use mnovis_traffic::records::DowntimeInterval;
use mnovis_traffic::records::MessageRecord;

use crate::chart::Chart;
use crate::chart::Id;
use crate::chart::Layout;
use crate::chart::Trace;
use crate::error::Result;
use crate::report::Report;
use crate::series::SeriesVars;
use crate::series::SeriesWriter;

const HOVER_TIME_FORMAT: &str = "%Y-%m-%d (%H:%M)";

pub(crate) struct DataEngine<'a> {
    path: &'a Path,
}

impl<'a> DataEngine<'a> {
    pub fn new(path: &'a Path) -> DataEngine<'a> {
        Self { path }
    }

    pub fn render(&mut self, report: &Report) -> Result<Vec<Chart>> {
        if !self.path.exists() {
            fs::create_dir(self.path)?;
        }

        let mut charts: Vec<Chart> = Vec::with_capacity(3);

        if let Some(downtime) = report.downtime.as_deref() {
            charts.push(self.downtime_chart(downtime)?);
        }

        if let Some(differences) = report.differences.as_deref() {
            charts.push(self.difference_chart(differences)?);
        }

        if let (Some(downtime), Some(periods)) =
            (report.downtime.as_deref(), report.periods.as_deref())
        {
            charts.push(self.overlay_chart(downtime, periods)?);
        }

        Ok(charts)
    }

    fn downtime_chart(&self, intervals: &[DowntimeInterval]) -> Result<Chart> {
        let points = intervals.iter().map(|interval| {
            (
                interval.start,
                interval.duration_seconds as f64,
                downtime_hover(interval),
            )
        });
        let (vars, data_file) = self.series(points)?;

        let layout = Layout::new(
            "Periods with the maximum window of time with 0 messages",
            "Date (Y-M-D) when the downtime started",
            "Downtime (s)",
        );
        let traces = vec![(vars, Trace::bar())];

        Chart::assemble(vec![data_file], &traces, &layout)
    }

    fn difference_chart(&self, differences: &[DifferenceRecord]) -> Result<Chart> {
        let points = differences.iter().map(|record| {
            (
                record.period_end,
                record.delta,
                format!(
                    "{} Value: {}",
                    record.period_end.format(HOVER_TIME_FORMAT),
                    record.delta
                ),
            )
        });
        let (vars, data_file) = self.series(points)?;

        let layout = Layout::new(
            "Message difference between two consecutive reporting periods",
            "Date (Y-M-D) when the two reporting periods ended",
            "No. of message(s)",
        );
        let traces = vec![(vars, Trace::line())];

        Chart::assemble(vec![data_file], &traces, &layout)
    }

    /// Downtime durations on the left axis against per-period message
    /// counts on the right one. Each downtime point carries the count of
    /// the period closest to the moment traffic resumed in its hover text.
    fn overlay_chart(
        &self,
        intervals: &[DowntimeInterval],
        periods: &[MessageRecord],
    ) -> Result<Chart> {
        let mut periods = periods.to_vec();
        periods.sort_unstable_by_key(|record| record.period_end);

        let downtime_points = intervals.iter().map(|interval| {
            let hover = match locate_nearest(&periods, interval.end) {
                Ok(nearest) => format!(
                    "{}<br>{} messages in the nearest period",
                    downtime_hover(interval),
                    nearest.count
                ),
                Err(error) => {
                    warn!(%error, "no period record to pair with the downtime interval");
                    downtime_hover(interval)
                }
            };

            (interval.end, interval.duration_seconds as f64, hover)
        });
        let (downtime_vars, downtime_file) = self.series(downtime_points)?;

        let traffic_points = periods.iter().map(|record| {
            (
                record.period_end,
                record.count as f64,
                format!(
                    "{} messages by {}",
                    record.count,
                    record.period_end.format(HOVER_TIME_FORMAT)
                ),
            )
        });
        let (traffic_vars, traffic_file) = self.series(traffic_points)?;

        let layout = Layout::new(
            "Downtime against message traffic",
            "Date (Y-M-D)",
            "Downtime (s)",
        )
        .with_secondary_axis("Messages per period");
        let traces = vec![
            (downtime_vars, Trace::line().named("downtime")),
            (
                traffic_vars,
                Trace::line().named("messages per period").on_secondary_axis(),
            ),
        ];

        Chart::assemble(vec![downtime_file, traffic_file], &traces, &layout)
    }

    fn series<I>(&self, points: I) -> Result<(SeriesVars, String)>
    where
        I: Iterator<Item = (DateTime<Utc>, f64, String)>,
    {
        let id = Id::next();
        let vars = SeriesVars::from(id);
        let data_file = id.data_file();

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.path.join(&data_file))?;

        let mut writer = SeriesWriter::new(file, vars.clone());
        writer.start()?;
        for (x, y, text) in points {
            writer.write(x, y, &text)?;
        }
        writer.end()?;

        Ok((vars, data_file))
    }
}

fn downtime_hover(interval: &DowntimeInterval) -> String {
    format!(
        "From: {}<br>To: {}<br>Downtime: {}",
        interval.start.format(HOVER_TIME_FORMAT),
        interval.end.format(HOVER_TIME_FORMAT),
        format_duration(interval.duration_seconds),
    )
}

/// Splits whole seconds into the `1d 2h 3m 4s` rendering of the hover box.
fn format_duration(total_seconds: i64) -> String {
    let days = total_seconds / 86400;
    let hours = total_seconds % 86400 / 3600;
    let minutes = total_seconds % 3600 / 60;
    let seconds = total_seconds % 60;

    format!("{days}d {hours}h {minutes}m {seconds}s")
}
