//! The optional TOML config file.
//!
//! ```toml
//! [remote]
//! default = "compiler"
//! publish_branch = "remoteCompile"
//! profile = "$HOME/.profile"
//!
//! [ssh]
//! identity_file = "~/.ssh/id_ed25519"
//! options = ["-o", "ServerAliveInterval=30"]
//!
//! [rsync]
//! extra_args = ["--compress"]
//! ```

use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of the config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub remote: RemoteSection,
    pub ssh: SshSettings,
    pub rsync: RsyncSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteSection {
    /// Remote alias used when neither `--remote` nor `RCOMPILE_REMOTE` is set.
    pub default: Option<String>,
    /// Branch the local HEAD is force-pushed to.
    pub publish_branch: Option<String>,
    /// Remote file sourced before the command runs. Placed inside double
    /// quotes, so `$HOME` expands remotely. Empty disables sourcing.
    pub profile: Option<String>,
}

/// Extra ssh arguments, shared by the remote session and rsync's transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SshSettings {
    pub identity_file: Option<String>,
    pub options: Vec<String>,
}

impl SshSettings {
    /// Arguments placed between `ssh` and the destination.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_string());
            args.push(shellexpand::tilde(identity).into_owned());
        }
        args.extend(self.options.iter().cloned());
        args
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsyncSettings {
    /// Appended to every rsync invocation before the source argument.
    pub extra_args: Vec<String>,
}

impl FileConfig {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `<platform config dir>/rcompile/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rcompile").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load the config file at `path`. A missing file yields defaults.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "loaded config file");
            FileConfig::parse(&content, path)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(FileConfig::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
