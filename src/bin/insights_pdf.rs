//! Renders an AI insights payload to PDF.

use std::process::ExitCode;

use geo_report::cli::{self, ReportArgs};

fn main() -> ExitCode {
    cli::init_logging();
    let args: ReportArgs = cli::parse_or_usage(cli::INSIGHTS_USAGE);
    cli::finish(cli::run_insights(&args))
}
