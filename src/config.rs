//! Startup configuration gathered from the command line and environment.

use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::Cli;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PFDATA_LOG";

/// Environment variable naming the parent directory for preview artifacts.
pub const TEMP_DIR_ENV: &str = "PFDATA_TEMP_DIR";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Resolved startup settings.
#[derive(Debug)]
pub struct Config {
    /// Archive to open before the shell starts.
    pub archive: Option<PathBuf>,
    /// Where preview artifacts go; the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// Log filter directives.
    pub log_filter: String,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            archive: cli.archive,
            temp_dir: env::var_os(TEMP_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            log_filter: env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Filter for the tracing subscriber, falling back to the default on
    /// unparsable directives.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}
