//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Diagnostics go to stderr so they never mix with the table on stdout.
//!
//! # Log Levels
//!
//! - `warn` (default): nothing expected in normal runs
//! - `debug` (`-v`): sync decisions (push vs replace, ignored parameters),
//!   file loading
//! - `trace` (`-vv`): evaluation counts on every change
//!
//! `URLFILTER_LOG` takes an `EnvFilter` directive and overrides the flags
//! when no `-v` is given, e.g. `URLFILTER_LOG=urlfilter=debug`.

use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "URLFILTER_LOG";

/// Configuration for logging behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Read the filter from [`LOG_ENV`] when set.
    pub use_env_filter: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: LevelFilter::WARN,
            use_env_filter: true,
            with_ansi: false,
        }
    }
}

impl LogConfig {
    /// Maps `-v` counts to levels: 0 → warn, 1 → debug, 2+ → trace.
    ///
    /// An explicit `-v` wins over [`LOG_ENV`].
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        LogConfig {
            level,
            use_env_filter: verbosity == 0,
            ..LogConfig::default()
        }
    }

    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Installs the global subscriber, writing to stderr.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    init_logging_with_writer(config, io::stderr)
}

/// Installs the global subscriber with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> Result<(), TryInitError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .compact()
        .without_time()
        .with_target(true)
        .with_ansi(config.with_ansi)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(build_env_filter(config))
        .with(layer)
        .try_init()
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directive(config.level));
    if config.use_env_filter {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}

/// Our crates at `level`, everything else at warn.
fn default_directive(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    format!("warn,urlfilter={level},urlfilter_cli={level}")
}
