//! The input model of a chart report.

use mnovis_traffic::records::DifferenceRecord;
use mnovis_traffic::records::DowntimeInterval;
use mnovis_traffic::records::MessageRecord;

/// The datasets one report draws, already normalized and filtered.
///
/// Every dataset is optional: a missing one skips its chart, and the
/// dual-axis overlay is drawn only when both the downtime and the
/// per-period dataset are present. An empty dataset still draws its chart,
/// just with no points.
#[derive(Debug, Default)]
pub struct Report {
    pub(crate) title: String,
    pub(crate) downtime: Option<Vec<DowntimeInterval>>,
    pub(crate) differences: Option<Vec<DifferenceRecord>>,
    pub(crate) periods: Option<Vec<MessageRecord>>,
}

impl Report {
    /// A report with the given page title and no datasets.
    pub fn new(title: String) -> Report {
        Self {
            title,
            downtime: None,
            differences: None,
            periods: None,
        }
    }

    /// Adds the downtime dataset, drawn as a bar chart.
    pub fn with_downtime(mut self, intervals: Vec<DowntimeInterval>) -> Report {
        self.downtime = Some(intervals);
        self
    }

    /// Adds the per-period difference dataset, drawn as a line chart.
    pub fn with_differences(mut self, differences: Vec<DifferenceRecord>) -> Report {
        self.differences = Some(differences);
        self
    }

    /// Adds the messages-per-period dataset, drawn against the downtime
    /// dataset on the dual-axis overlay.
    pub fn with_periods(mut self, periods: Vec<MessageRecord>) -> Report {
        self.periods = Some(periods);
        self
    }
}
