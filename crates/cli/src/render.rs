use std::path::Path;
use std::path::PathBuf;

use tracing::info;
use tracing::warn;

use mnovis_traffic::filter;
use mnovis_traffic::read;
use mnovis_vis::layout::VisLayout;
use mnovis_vis::report::Report;

use crate::cli::DirectionArg;
use crate::cli::PathExt;
use crate::cli::RenderArgs;
use crate::error::CliError;

const DOWNTIME_DATASET: &str = "msg_downtime.json";
const DIFFERENCE_DATASET: &str = "msg_diff_per_period.json";
const PERIODS_DATASET: &str = "msg_per_period.json";

pub(crate) fn render(args: RenderArgs) -> Result<(), CliError> {
    let output_path = args.output_path.or_current_dir()?;
    let direction = args.direction;

    info!(
        path = %args.path.display(),
        output = %output_path.display(),
        "rendering the {} message report",
        direction.label()
    );

    let mut report = Report::new(format!("{} messages", direction.label()));

    match read::downtime(&dataset_path(&args.path, direction, DOWNTIME_DATASET)) {
        Ok(intervals) => {
            let kept = filter::exceeding(&intervals, args.threshold);
            info!(
                total = intervals.len(),
                kept = kept.len(),
                threshold_seconds = args.threshold.seconds(),
                "filtered the downtime intervals"
            );
            report = report.with_downtime(kept);
        }
        Err(error) => warn!(%error, "skipping the downtime chart"),
    }

    match read::differences(&dataset_path(&args.path, direction, DIFFERENCE_DATASET)) {
        Ok(differences) => report = report.with_differences(differences),
        Err(error) => warn!(%error, "skipping the message difference chart"),
    }

    // Older exports do not carry the per-period dataset; without it only
    // the overlay chart is missing from the report.
    let periods_path = dataset_path(&args.path, direction, PERIODS_DATASET);
    if periods_path.exists() {
        match read::periods(&periods_path) {
            Ok(periods) => report = report.with_periods(periods),
            Err(error) => warn!(%error, "skipping the traffic overlay chart"),
        }
    }

    let vis = VisLayout::init(&output_path)?;
    vis.generate_report(&report)?;

    info!(report = %vis.root_path().display(), "generated the chart report");

    Ok(())
}

fn dataset_path(root: &Path, direction: DirectionArg, dataset: &str) -> PathBuf {
    root.join(direction.dataset_dir())
        .join(format!("{}_{dataset}", direction.label()))
}
