//! Resolved settings for one run.

use std::path::PathBuf;

use super::env::EnvReader;
use super::file::{FileConfig, RsyncSettings, SshSettings};
use super::source::Sourced;
use crate::pipeline::PipelineSettings;
use crate::{DEFAULT_PUBLISH_BRANCH, DEFAULT_REMOTE_ALIAS};

/// Profile sourced on the remote before the command runs.
pub const DEFAULT_PROFILE: &str = "$HOME/.profile";

/// Fully layered settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub remote_alias: Sourced<String>,
    pub publish_branch: Sourced<String>,
    pub profile: Sourced<String>,
    pub ssh: SshSettings,
    pub rsync: RsyncSettings,
}

impl Settings {
    /// Layer CLI, environment, config file and defaults.
    ///
    /// `config_path` is only used to label values read from the file.
    pub fn resolve<F>(
        cli_remote: Option<String>,
        file: FileConfig,
        config_path: Option<PathBuf>,
        env: &EnvReader<F>,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_origin = config_path.map(|p| p.display().to_string());
        let from_file = |value: Option<String>| {
            value.map(|v| Sourced::from_file(v, file_origin.clone()))
        };

        let remote_alias = cli_remote
            .map(|alias| Sourced::from_cli(alias, "--remote"))
            .or_else(|| env.get_string("REMOTE"))
            .or_else(|| from_file(file.remote.default))
            .unwrap_or_else(|| Sourced::default_value(DEFAULT_REMOTE_ALIAS.to_string()));

        let publish_branch = from_file(file.remote.publish_branch)
            .unwrap_or_else(|| Sourced::default_value(DEFAULT_PUBLISH_BRANCH.to_string()));

        let profile = from_file(file.remote.profile)
            .unwrap_or_else(|| Sourced::default_value(DEFAULT_PROFILE.to_string()));

        Self {
            remote_alias,
            publish_branch,
            profile,
            ssh: file.ssh,
            rsync: file.rsync,
        }
    }

    pub fn pipeline(&self) -> PipelineSettings {
        PipelineSettings {
            publish_branch: self.publish_branch.value.clone(),
            profile: self.profile.value.clone(),
        }
    }
}
