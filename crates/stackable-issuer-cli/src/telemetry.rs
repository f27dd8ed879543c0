//! Installs the tracing subscribers of the binary.
//!
//! Console logs go to stderr, because stdout carries the JSON results. The
//! console output is filtered by `CONSOLE_LOG_LEVEL` and the optional JSON
//! file output by `FILE_LOG_LEVEL`, both defaulting to `INFO`.
use std::path::PathBuf;

use clap::Args;
use snafu::{ResultExt, Snafu};
use tracing::{level_filters::LevelFilter, subscriber::SetGlobalDefaultError};
use tracing_appender::rolling::{InitError, Rotation, RollingFileAppender};
use tracing_subscriber::{EnvFilter, Layer, Registry, filter::Directive, layer::SubscriberExt};

pub const CONSOLE_LOG_ENV_VAR: &str = "CONSOLE_LOG_LEVEL";
pub const FILE_LOG_ENV_VAR: &str = "FILE_LOG_LEVEL";

const LOG_FILE_PREFIX: &str = "stackable-issuer";
const LOG_FILE_SUFFIX: &str = "tracing-rs.json";

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("unable to initialize rolling file appender"))]
    InitRollingFileAppender { source: InitError },

    #[snafu(display("unable to set the global default subscriber"))]
    SetGlobalDefaultSubscriber { source: SetGlobalDefaultError },
}

/// Logging related command line arguments.
#[derive(Debug, Default, PartialEq, Eq, Args)]
pub struct TelemetryOptions {
    /// Disable console logs.
    #[arg(long, env)]
    pub console_log_disabled: bool,

    /// Enable logging to files located in the specified DIRECTORY.
    #[arg(long, env, value_name = "DIRECTORY", group = "file_log")]
    pub file_log_directory: Option<PathBuf>,

    /// Time PERIOD after which log files are rolled over.
    #[arg(long, env, value_name = "PERIOD", requires = "file_log")]
    pub file_log_rotation_period: Option<RotationPeriod>,
}

/// Supported periods when the log file is rolled over.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "PascalCase")]
pub enum RotationPeriod {
    Minutely,
    Hourly,
    Daily,

    #[default]
    Never,
}

impl From<RotationPeriod> for Rotation {
    fn from(value: RotationPeriod) -> Self {
        match value {
            RotationPeriod::Minutely => Self::MINUTELY,
            RotationPeriod::Hourly => Self::HOURLY,
            RotationPeriod::Daily => Self::DAILY,
            RotationPeriod::Never => Self::NEVER,
        }
    }
}

/// Installs the subscribers described by `options` as the global default.
///
/// Nothing is installed if every output is disabled.
pub fn init(options: &TelemetryOptions) -> Result<()> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Sync + Send>> = Vec::new();

    if !options.console_log_disabled {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter_builder(CONSOLE_LOG_ENV_VAR, LevelFilter::INFO))
                .boxed(),
        );
    }

    if let Some(file_log_directory) = &options.file_log_directory {
        let file_appender = RollingFileAppender::builder()
            .rotation(options.file_log_rotation_period.unwrap_or_default().into())
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix(LOG_FILE_SUFFIX)
            .build(file_log_directory)
            .context(InitRollingFileAppenderSnafu)?;

        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_filter(env_filter_builder(FILE_LOG_ENV_VAR, LevelFilter::INFO))
                .boxed(),
        );
    }

    if !layers.is_empty() {
        tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layers))
            .context(SetGlobalDefaultSubscriberSnafu)?;
    }

    Ok(())
}

/// Create an [`EnvFilter`] configured with the given environment variable and default [`Directive`].
fn env_filter_builder(env_var: &str, default_directive: impl Into<Directive>) -> EnvFilter {
    EnvFilter::builder()
        .with_env_var(env_var)
        .with_default_directive(default_directive.into())
        .from_env_lossy()
}
