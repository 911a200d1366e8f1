use std::env;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

use mnovis_traffic::error::DatasetError;
use mnovis_traffic::filter::Threshold;
use mnovis_traffic::messages::Direction;
use mnovis_traffic::periods;

use crate::error::CliError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Render the chart report for one message direction.
    Render(RenderArgs),

    /// Fetch raw message data from the messaging platform.
    Fetch(FetchArgs),

    /// Compute the windows of downtime from a raw message export.
    Downtime(DowntimeArgs),

    /// Compute the messages per period and the per-period differences
    /// from a raw message export.
    Periods(PeriodsArgs),
}

#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Specify the directory the dataset files are read from. It must
    /// contain an `incoming_messages` and/or `outgoing_messages`
    /// subdirectory, as written by the compute commands.
    #[arg(short, long, value_parser(parse_dir))]
    pub(crate) path: PathBuf,

    /// Specify the path where the generated report will be created.
    /// If the output path is not specified then the current working
    /// directory is used.
    #[arg(short, long, value_parser(parse_dir))]
    pub(crate) output_path: Option<PathBuf>,

    /// Select the message direction to render.
    #[arg(short, long, value_enum, default_value = "in")]
    pub(crate) direction: DirectionArg,

    /// Hide the downtime intervals that lasted no longer than this many
    /// seconds; accepts a plain number or an HH:MM:SS value.
    #[arg(short, long, default_value = "1")]
    pub(crate) threshold: Threshold,
}

#[derive(Args)]
pub(crate) struct FetchArgs {
    /// The domain the platform instance is running on.
    #[arg(short, long)]
    pub(crate) domain: String,

    /// Specify the API token for authenticating to the instance.
    #[arg(short, long)]
    pub(crate) token: String,

    /// Specify the resource to fetch: the live messages endpoint or the
    /// gzipped message archives.
    #[arg(short, long, value_enum, default_value = "messages")]
    pub(crate) resource_type: Resource,

    /// Only fetch messages sent on or after this timestamp.
    #[arg(short, long)]
    pub(crate) after: Option<DateTime<Utc>>,

    /// Only fetch messages sent before this timestamp.
    #[arg(short, long)]
    pub(crate) before: Option<DateTime<Utc>>,

    /// Specify the file where the fetched data will be written.
    #[arg(short, long)]
    pub(crate) output_file: PathBuf,
}

#[derive(Args)]
pub(crate) struct DowntimeArgs {
    /// File to read the raw message export from.
    #[arg(short, long, value_parser(parse_file))]
    pub(crate) input: PathBuf,

    /// File to write the computed windows of downtime to.
    #[arg(short, long)]
    pub(crate) output: PathBuf,

    /// The operator to analyze for downtime: a URN scheme such as
    /// `telegram`, or a dialing-code prefix for phone numbers.
    #[arg(long)]
    pub(crate) operator: String,

    /// The direction of the messages to limit the analysis to.
    #[arg(short, long, value_enum)]
    pub(crate) direction: DirectionArg,

    /// The start of the analyzed range, as an ISO 8601 timestamp.
    #[arg(short, long)]
    pub(crate) start_date: DateTime<Utc>,

    /// The end of the analyzed range, as an ISO 8601 timestamp.
    #[arg(short, long)]
    pub(crate) end_date: DateTime<Utc>,
}

#[derive(Args)]
pub(crate) struct PeriodsArgs {
    /// File to read the raw message export from.
    #[arg(short, long, value_parser(parse_file))]
    pub(crate) input: PathBuf,

    /// File to write the computed messages per period to.
    #[arg(short, long)]
    pub(crate) output: PathBuf,

    /// File to write the per-period message differences to.
    #[arg(short = 'f', long)]
    pub(crate) differences_output: PathBuf,

    /// The operator to analyze: a URN scheme such as `telegram`, or a
    /// dialing-code prefix for phone numbers.
    #[arg(long)]
    pub(crate) operator: String,

    /// The direction of the messages to limit the analysis to.
    #[arg(short, long, value_enum)]
    pub(crate) direction: DirectionArg,

    /// The start of the analyzed range, as an ISO 8601 timestamp.
    #[arg(short, long)]
    pub(crate) start_date: DateTime<Utc>,

    /// The end of the analyzed range, as an ISO 8601 timestamp.
    #[arg(short, long)]
    pub(crate) end_date: DateTime<Utc>,

    /// The period width as an HH:MM:SS value.
    #[arg(short = 'w', long, default_value = "00:10:00", value_parser(parse_period))]
    pub(crate) period: TimeDelta,
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum DirectionArg {
    In,
    Out,
}

impl DirectionArg {
    pub(crate) fn direction(self) -> Direction {
        match self {
            DirectionArg::In => Direction::In,
            DirectionArg::Out => Direction::Out,
        }
    }

    /// The dataset directory this direction reads from, as laid out by the
    /// compute commands.
    pub(crate) fn dataset_dir(self) -> &'static str {
        match self {
            DirectionArg::In => "incoming_messages",
            DirectionArg::Out => "outgoing_messages",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            DirectionArg::In => "incoming",
            DirectionArg::Out => "outgoing",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Resource {
    Messages,
    Archives,
}

fn parse_dir(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);

    if !path.exists() {
        return Err(format!("The `{}` path does not exist.", path.display()));
    }

    if !path.is_dir() {
        return Err(format!(
            "The `{}` path must point to a directory.",
            path.display()
        ));
    }

    Ok(path)
}

fn parse_file(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);

    if !path.is_file() {
        return Err(format!(
            "The `{}` path must point to an existing file.",
            path.display()
        ));
    }

    Ok(path)
}

fn parse_period(input: &str) -> Result<TimeDelta, DatasetError> {
    periods::width_from_str(input)
}

pub(crate) trait PathExt {
    fn or_current_dir(self) -> Result<PathBuf, CliError>;
}

impl PathExt for Option<PathBuf> {
    fn or_current_dir(self) -> Result<PathBuf, CliError> {
        if let Some(path) = self {
            Ok(path)
        } else {
            env::current_dir().map_err(|e| CliError::Path(e.to_string()))
        }
    }
}
