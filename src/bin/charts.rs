//! Rasterizes the visibility report charts to PNG files.

use std::process::ExitCode;

use geo_report::cli::{self, ChartArgs};

fn main() -> ExitCode {
    cli::init_logging();
    let args: ChartArgs = cli::parse_or_usage(cli::CHARTS_USAGE);
    cli::finish(cli::run_charts(&args))
}
