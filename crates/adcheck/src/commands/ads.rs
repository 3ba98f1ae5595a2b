//! Ads command: validate a Google Ads responsive search ad bundle.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, info, instrument};

use adcheck_core::{AdsInput, AssetReport, InputResult, validate_ads};

use super::read_input;

/// Arguments shared by the bundle validation subcommands.
#[derive(Args, Debug, Default)]
pub struct AdsArgs {
    /// JSON file with the ad's asset lists (optionally nested under `ads`).
    /// Reads stdin when omitted or `-`.
    pub file: Option<Utf8PathBuf>,

    /// Write a corrected bundle (over-long items shortened) to this file.
    #[arg(long, value_name = "OUT")]
    pub write_corrected: Option<Utf8PathBuf>,
}

impl AdsArgs {
    pub(crate) fn source(&self) -> String {
        self.file
            .as_ref()
            .filter(|p| p.as_str() != "-")
            .map_or_else(|| "stdin".to_string(), ToString::to_string)
    }
}

/// Validate a responsive search ad bundle and print the report.
#[instrument(name = "cmd_ads", skip_all, fields(source = %args.source()))]
pub fn cmd_ads(
    args: AdsArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    run_validation(
        &args,
        global_json,
        max_input_bytes,
        AdsInput::bundle_from_json,
        validate_ads,
    )
}

/// Read, validate and report one bundle.
///
/// Prints the report (text or JSON), writes the corrected bundle when asked
/// and there is something to correct, and fails in text mode when the
/// bundle is invalid.
pub(crate) fn run_validation<R: AssetReport>(
    args: &AdsArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
    parse: fn(&str) -> InputResult<R::Bundle>,
    validate: fn(&R::Bundle) -> R,
) -> anyhow::Result<()> {
    let source = args.source();
    debug!(%source, write_corrected = ?args.write_corrected, "executing validation");

    let content = read_input(args.file.as_deref(), max_input_bytes)?;
    let bundle = parse(&content).with_context(|| format!("failed to parse ad bundle from {source}"))?;

    let report = validate(&bundle);
    info!(
        valid = report.is_valid(),
        problems = report.problem_count(),
        length_issues = report.length_issues().len(),
        "ad bundle checked"
    );

    if let Some(ref out) = args.write_corrected
        && !report.length_issues().is_empty()
    {
        let corrected = report.corrected(&bundle);
        let json = serde_json::to_string_pretty(&corrected)?;
        std::fs::write(out.as_std_path(), json + "\n")
            .with_context(|| format!("failed to write {out}"))?;
        eprintln!("{} corrected bundle written to {out}", "NOTE:".cyan());
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{report}");

    if !report.is_valid() {
        bail!(
            "{source} failed validation ({} problems, {} length issues)",
            report.problem_count().red(),
            report.length_issues().len().red(),
        );
    }
    Ok(())
}
