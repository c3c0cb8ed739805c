//! Provenance tracking for configuration values.

use std::fmt;

/// Where a configuration value was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in default.
    Default,
    /// The TOML config file.
    ConfigFile,
    /// An `RCOMPILE_*` environment variable.
    Environment,
    /// A command-line option.
    CommandLine,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Environment => write!(f, "environment"),
            Self::CommandLine => write!(f, "command line"),
        }
    }
}

/// A value together with its [`ConfigSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: ConfigSource,
    /// Variable name or file path the value was read from, when there is one.
    pub origin: Option<String>,
}

impl<T> Sourced<T> {
    pub fn default_value(value: T) -> Self {
        Self {
            value,
            source: ConfigSource::Default,
            origin: None,
        }
    }

    pub fn from_env(value: T, var: impl Into<String>) -> Self {
        Self {
            value,
            source: ConfigSource::Environment,
            origin: Some(var.into()),
        }
    }

    pub fn from_file(value: T, path: Option<String>) -> Self {
        Self {
            value,
            source: ConfigSource::ConfigFile,
            origin: path,
        }
    }

    pub fn from_cli(value: T, flag: impl Into<String>) -> Self {
        Self {
            value,
            source: ConfigSource::CommandLine,
            origin: Some(flag.into()),
        }
    }

    /// Human readable provenance, e.g. `environment (RCOMPILE_REMOTE)`.
    pub fn describe_source(&self) -> String {
        match &self.origin {
            Some(origin) => format!("{} ({})", self.source, origin),
            None => self.source.to_string(),
        }
    }
}
