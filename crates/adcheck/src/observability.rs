//! Logging setup.
//!
//! Events go to stderr in a compact human format, and to a daily-rolling JSONL
//! file when a log directory can be resolved. Stdout is never written to: it
//! carries reports and, under `serve`, the MCP protocol.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Explicit log file path.
const LOG_PATH_ENV: &str = "ADCHECK_LOG_PATH";
/// Log directory (file name defaults to [`LOG_FILE_PREFIX`]).
const LOG_DIR_ENV: &str = "ADCHECK_LOG_DIR";
const LOG_FILE_PREFIX: &str = "adcheck.jsonl";

/// Where log files go.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// File name prefix inside `log_dir`.
    pub file_prefix: String,
}

impl ObservabilityConfig {
    /// Resolve the log location.
    ///
    /// Precedence: `ADCHECK_LOG_PATH`, `ADCHECK_LOG_DIR`, the configured
    /// `log_dir`, then the platform data directory.
    pub fn from_env_with_overrides(config_dir: Option<PathBuf>) -> Self {
        if let Some(path) = std::env::var_os(LOG_PATH_ENV).map(PathBuf::from)
            && let Some(name) = path.file_name()
        {
            return Self {
                log_dir: Some(
                    path.parent()
                        .filter(|p| !p.as_os_str().is_empty())
                        .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
                ),
                file_prefix: name.to_string_lossy().into_owned(),
            };
        }

        let log_dir = std::env::var_os(LOG_DIR_ENV)
            .map(PathBuf::from)
            .or(config_dir)
            .or_else(|| {
                adcheck_core::config::user_data_local_dir()
                    .map(|dir| dir.join("logs").into_std_path_buf())
            });

        Self {
            log_dir,
            file_prefix: LOG_FILE_PREFIX.to_string(),
        }
    }
}

/// Build the stderr filter.
///
/// `RUST_LOG` wins; otherwise `-q` shows errors only, each `-v` raises the
/// level one step, and with neither the configured level applies.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        }
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
///
/// Hold the returned guard until exit so buffered file events are flushed.
/// File logging is best effort: an unwritable directory falls back to stderr
/// only.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(filter);

    let (file_layer, guard) = match config
        .log_dir
        .as_deref()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
    {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}
