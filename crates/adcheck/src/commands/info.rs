//! Info command implementation

use adcheck_core::config::{Config, ConfigSources};
use adcheck_core::{AdFormat, AssetKind, DEFAULT_LIMIT};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    default_limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            default_limit: config.default_limit.unwrap_or(DEFAULT_LIMIT),
            max_input_bytes: config.input_limit(),
        }
    }
}

#[derive(Serialize)]
struct RuleInfo {
    format: AdFormat,
    kind: AssetKind,
    max_chars: usize,
    min_count: usize,
    max_count: usize,
}

fn rules() -> Vec<RuleInfo> {
    AdFormat::ALL
        .into_iter()
        .flat_map(|format| {
            format.kinds().iter().filter_map(move |&kind| {
                let rule = format.rule(kind)?;
                Some(RuleInfo {
                    format,
                    kind,
                    max_chars: rule.max_chars,
                    min_count: rule.min_count,
                    max_count: rule.max_count,
                })
            })
        })
        .collect()
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    rules: Vec<RuleInfo>,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let info = PackageInfo::new();

    debug!(json_output = global_json, "executing info command");

    let config_info = ConfigInfo::from_config(config, sources);
    let full_info = FullInfo {
        package: info,
        config: config_info,
        rules: rules(),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
    } else {
        println!(
            "{} {}",
            full_info.package.name.bold(),
            full_info.package.version.green()
        );
        if !full_info.package.description.is_empty() {
            println!("{}", full_info.package.description);
        }
        if !full_info.package.license.is_empty() {
            println!("{}: {}", "License".dimmed(), full_info.package.license);
        }
        if !full_info.package.repository.is_empty() {
            println!(
                "{}: {}",
                "Repository".dimmed(),
                full_info.package.repository.cyan()
            );
        }
        if !full_info.package.homepage.is_empty() {
            println!(
                "{}: {}",
                "Homepage".dimmed(),
                full_info.package.homepage.cyan()
            );
        }

        // Configuration section
        println!();
        println!("{}", "Configuration".bold().underline());
        if let Some(ref path) = full_info.config.config_file {
            println!("{}: {}", "Config file".dimmed(), path.cyan());
        } else {
            println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
        }
        println!("{}: {}", "Log level".dimmed(), full_info.config.log_level);
        if let Some(ref dir) = full_info.config.log_dir {
            println!("{}: {}", "Log directory".dimmed(), dir);
        }

        println!(
            "{}: {}",
            "Default limit".dimmed(),
            full_info.config.default_limit
        );
        match full_info.config.max_input_bytes {
            Some(max) => println!("{}: {max} bytes", "Max input".dimmed()),
            None => println!("{}: {}", "Max input".dimmed(), "unlimited".yellow()),
        }

        println!();
        println!("{}", "Asset Rules".bold().underline());
        let mut current = None;
        for rule in &full_info.rules {
            if current != Some(rule.format) {
                println!("{}", rule.format.label());
                current = Some(rule.format);
            }
            let count = if rule.min_count == rule.max_count {
                format!("exactly {}", rule.min_count)
            } else {
                format!("{}-{}", rule.min_count, rule.max_count)
            };
            println!(
                "  {}: max {} chars, {} items",
                rule.kind.plural_label().dimmed(),
                rule.max_chars,
                count
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::default()
    }

    fn test_sources() -> ConfigSources {
        ConfigSources::default()
    }

    #[test]
    fn test_cmd_info_text_succeeds() {
        assert!(cmd_info(InfoArgs::default(), false, &test_config(), &test_sources()).is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        assert!(cmd_info(InfoArgs::default(), true, &test_config(), &test_sources()).is_ok());
    }

    #[test]
    fn test_config_info_no_file() {
        let config = Config::default();
        let sources = ConfigSources::default();
        let info = ConfigInfo::from_config(&config, &sources);
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.default_limit, 30);
    }

    #[test]
    fn test_rules_cover_every_format() {
        let rules = rules();
        assert_eq!(rules.len(), 7);
        assert_eq!(rules[2].format, AdFormat::ResponsiveSearch);
        assert_eq!(rules[2].kind, AssetKind::Path);
        assert_eq!(rules[2].min_count, rules[2].max_count);

        let long = &rules[4];
        assert_eq!(long.format, AdFormat::PerformanceMax);
        assert_eq!(long.kind, AssetKind::LongHeadline);
        assert_eq!((long.min_count, long.max_count), (1, 5));
    }
}
