//! The on-disk layout of a generated chart report.

mod data;

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::error::Result;
use crate::layout::data::DataEngine;
use crate::report::Report;
use crate::template::TemplateEngine;

/// The chart report directory is structured as follows:
///
/// ./vis/index.html
///
/// ./vis/data/data1.js
/// ./vis/data/data2.js
/// ./vis/data/...
/// ./vis/data/dataN.js
///
/// The __index__ file is the entry point into the report and pulls in the
/// charting library; the __data__ directory holds one file per rendered
/// chart series.
pub struct VisLayout {
    root_path: PathBuf,
    index_file_path: PathBuf,
    data_path: PathBuf,
}

impl VisLayout {
    const MAIN_DIR_NAME: &str = "vis";
    const DATA_DIR_NAME: &str = "data";
    const INDEX_FILE_NAME: &str = "index.html";

    /// Prepares the report directory under `path`.
    pub fn init(path: &Path) -> Result<VisLayout> {
        let root_path = path.join(Self::MAIN_DIR_NAME);
        let index_file_path = root_path.join(Self::INDEX_FILE_NAME);
        let data_path = root_path.join(Self::DATA_DIR_NAME);

        fs::create_dir_all(&root_path)?;

        Ok(Self {
            root_path,
            data_path,
            index_file_path,
        })
    }

    /// Where the generated report lives.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Renders the report: one data file per chart series, then the index
    /// page wiring them together.
    ///
    /// The rendering context is built fresh on every call and dropped at
    /// the end of it; nothing carries over between draws.
    pub fn generate_report(&self, report: &Report) -> Result<()> {
        let mut engine = DataEngine::new(&self.data_path);
        let charts = engine.render(report)?;

        let template = TemplateEngine::new(&self.index_file_path);
        template.render(&report.title, &charts)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use chrono::TimeZone;
    use chrono::Utc;
    use mnovis_traffic::records::DifferenceRecord;
    use mnovis_traffic::records::DowntimeInterval;
    use mnovis_traffic::records::MessageRecord;

    use super::*;

    fn at(offset_seconds: i64) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 7, 29, 10, 0, 0).unwrap() + TimeDelta::seconds(offset_seconds)
    }

    fn report() -> Report {
        Report::new(String::from("incoming messages"))
            .with_downtime(vec![
                DowntimeInterval::between(at(0), at(5400)),
                DowntimeInterval::between(at(5400), at(5500)),
            ])
            .with_differences(vec![DifferenceRecord {
                period_end: at(600),
                delta: -3.0,
            }])
            .with_periods(vec![MessageRecord {
                period_start: at(0),
                period_end: at(600),
                count: 12,
            }])
    }

    #[test]
    fn generates_the_report_directory() {
        let dir = tempfile::tempdir().unwrap();

        let vis = VisLayout::init(dir.path()).unwrap();
        vis.generate_report(&report()).unwrap();

        let index = fs::read_to_string(vis.root_path().join("index.html")).unwrap();
        let data_files = fs::read_dir(vis.root_path().join("data")).unwrap().count();

        // downtime bar + difference line + overlay with two series
        assert_eq!(data_files, 4);
        assert_eq!(index.matches("Plotly.newPlot").count(), 3);
        assert!(index.contains("incoming messages"));
    }

    #[test]
    fn an_empty_report_still_renders_an_index_page() {
        let dir = tempfile::tempdir().unwrap();

        let vis = VisLayout::init(dir.path()).unwrap();
        vis.generate_report(&Report::new(String::from("outgoing messages")))
            .unwrap();

        let index = fs::read_to_string(vis.root_path().join("index.html")).unwrap();

        assert!(!index.contains("Plotly.newPlot"));
    }

    #[test]
    fn empty_datasets_render_empty_charts() {
        let dir = tempfile::tempdir().unwrap();

        let vis = VisLayout::init(dir.path()).unwrap();
        let report = Report::new(String::from("incoming messages"))
            .with_downtime(Vec::new())
            .with_differences(Vec::new());
        vis.generate_report(&report).unwrap();

        let index = fs::read_to_string(vis.root_path().join("index.html")).unwrap();

        // no periods dataset, so no overlay; the two empty charts remain
        assert_eq!(index.matches("Plotly.newPlot").count(), 2);
    }
}
