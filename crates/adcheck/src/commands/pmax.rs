//! Pmax command: validate a Performance Max asset group.

use tracing::instrument;

use adcheck_core::{PmaxInput, validate_pmax};

use super::ads::{AdsArgs, run_validation};

/// Validate a Performance Max asset group and print the report.
#[instrument(name = "cmd_pmax", skip_all, fields(source = %args.source()))]
pub fn cmd_pmax(
    args: AdsArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    run_validation(
        &args,
        global_json,
        max_input_bytes,
        PmaxInput::bundle_from_json,
        validate_pmax,
    )
}
