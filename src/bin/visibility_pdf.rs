//! Renders the GEO visibility report, embedding charts from a directory.

use std::process::ExitCode;

use geo_report::cli::{self, VisibilityArgs};

fn main() -> ExitCode {
    cli::init_logging();
    let args: VisibilityArgs = cli::parse_or_usage(cli::VISIBILITY_USAGE);
    cli::finish(cli::run_visibility(&args))
}
