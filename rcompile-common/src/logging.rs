//! Tracing setup for the rcompile binary.
//!
//! Output goes to stderr so it never mixes with the remote command's
//! stdout. The filter comes from `RCOMPILE_LOG` (any `EnvFilter`
//! directive), falling back to the configured default level.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Variable holding the filter directive.
pub const LOG_ENV_VAR: &str = "RCOMPILE_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `rcompile_common=debug`.
    pub filter: String,
    /// Include event targets in output.
    pub with_target: bool,
}

impl LogConfig {
    /// Read the filter from [`LOG_ENV_VAR`], using `default_level` when unset.
    pub fn from_env(default_level: &str) -> Self {
        Self::from_lookup(default_level, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(default_level: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let filter = lookup(LOG_ENV_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default_level.to_string());
        Self {
            filter,
            with_target: false,
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .without_time()
        .compact();

    tracing_subscriber::registry().with(filter).with(layer).try_init()
}
