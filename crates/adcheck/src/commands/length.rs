//! Length command: check text against a character limit.

use anyhow::bail;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use adcheck_core::{AssetKind, LengthInput, LengthReport};

use super::read_stdin;

/// Arguments for the `length` subcommand.
#[derive(Args, Debug, Default)]
pub struct LengthArgs {
    /// Texts to check. Reads one text per non-blank stdin line when omitted.
    pub texts: Vec<String>,

    /// Maximum allowed length (default: the configured limit, else 30).
    #[arg(long)]
    pub limit: Option<usize>,

    /// Use the per-item limit of an ad asset category.
    #[arg(long, value_enum)]
    pub kind: Option<AssetKind>,
}

impl LengthArgs {
    /// The limit asked for on the command line: `--limit`, then `--kind`.
    fn requested_limit(&self) -> Option<usize> {
        self.limit.or_else(|| self.kind.map(AssetKind::max_chars))
    }
}

/// Check one or more texts against a limit.
#[instrument(name = "cmd_length", skip_all, fields(texts = args.texts.len()))]
pub fn cmd_length(
    args: LengthArgs,
    global_json: bool,
    config_limit: Option<usize>,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(limit = ?args.limit, kind = ?args.kind, "executing length command");

    let limit = args.requested_limit();
    let texts = if args.texts.is_empty() {
        stdin_texts(&read_stdin(max_input_bytes)?)
    } else {
        args.texts
    };
    if texts.is_empty() {
        bail!("no text to check: pass TEXT arguments or pipe lines on stdin");
    }

    let reports: Vec<LengthReport> = texts
        .into_iter()
        .map(|text| LengthInput::new(text, limit).check_with_default(config_limit))
        .collect();
    let too_long = reports.iter().filter(|r| !r.valid).count();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let rendered: Vec<String> = reports.iter().map(ToString::to_string).collect();
    println!("{}", rendered.join("\n\n"));

    if too_long > 0 {
        bail!(
            "{} of {} texts exceed the limit",
            too_long.red(),
            reports.len()
        );
    }
    Ok(())
}

/// Split stdin into texts: one per line, blank lines skipped.
fn stdin_texts(input: &str) -> Vec<String> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_flag_wins_over_kind() {
        let args = LengthArgs {
            limit: Some(12),
            kind: Some(AssetKind::Description),
            ..LengthArgs::default()
        };
        assert_eq!(args.requested_limit(), Some(12));
    }

    #[test]
    fn kind_selects_category_limit() {
        let args = LengthArgs {
            kind: Some(AssetKind::Path),
            ..LengthArgs::default()
        };
        assert_eq!(args.requested_limit(), Some(15));

        let args = LengthArgs {
            kind: Some(AssetKind::LongHeadline),
            ..LengthArgs::default()
        };
        assert_eq!(args.requested_limit(), Some(90));
    }

    #[test]
    fn config_limit_is_the_fallback() {
        let check = |args: &LengthArgs, config: Option<usize>| {
            LengthInput::new("abc", args.requested_limit())
                .check_with_default(config)
                .limit
        };
        assert_eq!(check(&LengthArgs::default(), Some(25)), 25);
        assert_eq!(check(&LengthArgs::default(), None), 30);

        let zero = LengthArgs {
            limit: Some(0),
            ..LengthArgs::default()
        };
        assert_eq!(check(&zero, Some(25)), 25);
    }

    #[test]
    fn stdin_skips_blank_lines() {
        let texts = stdin_texts("Buy now\n\n   \nFree shipping\r\n");
        assert_eq!(texts, ["Buy now", "Free shipping"]);
    }

    #[test]
    fn valid_texts_succeed() {
        let args = LengthArgs {
            texts: vec!["Buy now".to_string()],
            ..LengthArgs::default()
        };
        assert!(cmd_length(args, false, None, None).is_ok());
    }

    #[test]
    fn too_long_text_fails() {
        let args = LengthArgs {
            texts: vec!["x".repeat(31)],
            ..LengthArgs::default()
        };
        assert!(cmd_length(args, false, None, None).is_err());
    }

    #[test]
    fn json_mode_reports_without_failing() {
        let args = LengthArgs {
            texts: vec!["x".repeat(31)],
            ..LengthArgs::default()
        };
        assert!(cmd_length(args, true, None, None).is_ok());
    }
}
