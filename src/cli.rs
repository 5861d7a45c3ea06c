//! Shared command-line plumbing for the four programs.
//!
//! Each binary parses its positional arguments with clap, runs one of the
//! `run_*` functions below and prints a single JSON line on stdout. Logs go to
//! stderr so stdout stays machine-readable.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

use clap::error::ErrorKind;
use clap::Parser;
use log::error;
use serde::Serialize;

use crate::charts::canvas::ChartFonts;
use crate::charts::generate_charts;
use crate::error::ReportError;
use crate::input::load_json;
use crate::model::charts::ChartInput;
use crate::model::insights::InsightsReport;
use crate::model::score::ScoreReport;
use crate::model::visibility::VisibilityReport;
use crate::report::{insights, score, visibility, RenderContext};

pub const SCORE_USAGE: &str = "Usage: score_pdf <input.json> <output.pdf>";
pub const INSIGHTS_USAGE: &str = "Usage: insights_pdf <input.json> <output.pdf>";
pub const VISIBILITY_USAGE: &str = "Usage: visibility_pdf <input.json> <charts_dir> <output.pdf>";
pub const CHARTS_USAGE: &str = "Usage: charts <input.json> <output_dir>";

/// Arguments of `score_pdf` and `insights_pdf`.
#[derive(Debug, Parser)]
#[command(version, about = "Render a GEO report payload to PDF")]
pub struct ReportArgs {
    /// JSON payload to render.
    pub input: PathBuf,
    /// Destination PDF file.
    pub output: PathBuf,
}

#[derive(Debug, Parser)]
#[command(version, about = "Render the GEO visibility report to PDF")]
pub struct VisibilityArgs {
    pub input: PathBuf,
    /// Directory holding the chart PNGs to embed; missing charts are skipped.
    pub charts_dir: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Parser)]
#[command(version, about = "Rasterize the visibility report charts to PNG")]
pub struct ChartArgs {
    pub input: PathBuf,
    /// Created if it does not exist.
    pub output_dir: PathBuf,
}

/// The JSON line every program ends with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn written(path: &Path) -> Self {
        Self {
            success: true,
            path: Some(path.display().to_string()),
            ..Self::default()
        }
    }

    pub fn charts(paths: &[PathBuf]) -> Self {
        Self {
            success: true,
            charts: Some(paths.iter().map(|path| path.display().to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn failure(err: &ReportError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            ..Self::default()
        }
    }

    pub fn to_json(&self) -> String {
        // Only strings and booleans; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from(r#"{"success":false}"#))
    }
}

/// Installs the stderr logger; `RUST_LOG` overrides the `warn` default.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Parses the arguments or prints `usage` and exits with status 1.
///
/// `--help` and `--version` keep clap's behaviour.
pub fn parse_or_usage<T: Parser>(usage: &str) -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(_) => {
            println!("{}", usage);
            process::exit(1);
        }
    }
}

/// Prints the envelope for `result` and maps it to the exit status.
pub fn finish(result: Result<Envelope, ReportError>) -> ExitCode {
    let (envelope, code) = match result {
        Ok(envelope) => (envelope, ExitCode::SUCCESS),
        Err(err) => {
            error!("{}", err);
            (Envelope::failure(&err), ExitCode::FAILURE)
        }
    };
    println!("{}", envelope.to_json());
    code
}

pub fn run_score(args: &ReportArgs) -> Result<Envelope, ReportError> {
    let data: ScoreReport = load_json(&args.input)?;
    let context = RenderContext::default();
    let path = score::assemble(&data, &context).write_to(&context.theme, &args.output)?;
    Ok(Envelope::written(&path))
}

pub fn run_insights(args: &ReportArgs) -> Result<Envelope, ReportError> {
    let data: InsightsReport = load_json(&args.input)?;
    let context = RenderContext::default();
    let path = insights::assemble(&data, &context).write_to(&context.theme, &args.output)?;
    Ok(Envelope::written(&path))
}

pub fn run_visibility(args: &VisibilityArgs) -> Result<Envelope, ReportError> {
    let data: VisibilityReport = load_json(&args.input)?;
    let context = RenderContext::default();
    let path = visibility::assemble(&data, &args.charts_dir, &context)
        .write_to(&context.theme, &args.output)?;
    Ok(Envelope::written(&path))
}

/// Writes every chart it can, printing one progress line per chart.
pub fn run_charts(args: &ChartArgs) -> Result<Envelope, ReportError> {
    fs::create_dir_all(&args.output_dir).map_err(|err| {
        ReportError::render(format!(
            "Failed to create {}: {}",
            args.output_dir.display(),
            err
        ))
    })?;
    let data: ChartInput = load_json(&args.input)?;
    let context = RenderContext::default();
    let fonts = ChartFonts::discover();

    let mut written = Vec::new();
    for (kind, result) in generate_charts(&data, &args.output_dir, &context.theme, fonts.as_ref()) {
        match result {
            Ok(outcome) => {
                println!("Created: {}", kind.file_name());
                written.push(outcome.path);
            }
            Err(err) => {
                error!("{} chart failed: {}", kind, err);
                println!("Error creating {}: {}", kind, err);
            }
        }
    }
    Ok(Envelope::charts(&written))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_fields_keep_their_order() {
        let envelope = Envelope::written(Path::new("out/report.pdf"));
        assert_eq!(envelope.to_json(), r#"{"success":true,"path":"out/report.pdf"}"#);

        let envelope = Envelope::charts(&[PathBuf::from("c/a.png"), PathBuf::from("c/b.png")]);
        assert_eq!(envelope.to_json(), r#"{"success":true,"charts":["c/a.png","c/b.png"]}"#);
    }

    #[test]
    fn failures_carry_the_error_message() {
        let err = ReportError::Load("No such file or directory (os error 2)".into());
        assert_eq!(
            Envelope::failure(&err).to_json(),
            r#"{"success":false,"error":"Error loading JSON: No such file or directory (os error 2)"}"#
        );
    }

    #[test]
    fn positional_arguments_are_required() {
        assert!(ReportArgs::try_parse_from(["score_pdf", "in.json"]).is_err());
        assert!(VisibilityArgs::try_parse_from(["visibility_pdf", "in.json", "charts"]).is_err());
        let args = ChartArgs::try_parse_from(["charts", "in.json", "out"]).expect("two arguments");
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert!(ChartArgs::try_parse_from(["charts", "a", "b", "c"]).is_err());
    }

    #[test]
    fn charts_fail_on_unreadable_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let args = ChartArgs {
            input: dir.path().join("missing.json"),
            output_dir: dir.path().join("charts"),
        };
        let err = run_charts(&args).expect_err("missing input");
        assert!(matches!(err, ReportError::Load(_)));
        assert!(args.output_dir.is_dir());
    }
}
