//! `FileSync` backed by rsync over ssh.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::process::{run_with_input, tool_command};
use super::{FileSync, SshSession, nul_separated};
use crate::config::RsyncSettings;
use crate::error::SyncError;
use crate::remote::RemoteRef;

const TOOL: &str = "rsync";

/// Transfers explicit path lists between the local repository root and the
/// remote repository path.
#[derive(Debug, Clone)]
pub struct RsyncTransfer {
    local_root: PathBuf,
    transport: Option<String>,
    extra_args: Vec<String>,
}

impl RsyncTransfer {
    pub fn new(local_root: impl Into<PathBuf>, ssh: &SshSession, settings: &RsyncSettings) -> Self {
        Self {
            local_root: local_root.into(),
            transport: ssh.rsync_transport(),
            extra_args: settings.extra_args.clone(),
        }
    }

    /// Replace the remote shell rsync uses.
    #[cfg(test)]
    fn with_transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = Some(transport.into());
        self
    }

    fn base_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["--archive", "--protect-args", "--from0", "--files-from=-"]
            .into_iter()
            .map(String::from)
            .collect();
        if let Some(transport) = &self.transport {
            args.push("-e".to_string());
            args.push(transport.clone());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    fn local_dir(&self) -> String {
        dir_arg(&self.local_root)
    }

    /// Arguments for local -> remote, deleting listed paths missing locally.
    pub fn push_args(&self, remote: &RemoteRef) -> Vec<String> {
        let mut args = self.base_args();
        args.insert(4, "--delete-missing-args".to_string());
        args.push(self.local_dir());
        args.push(remote.rsync_root());
        args
    }

    /// Arguments for remote -> local.
    pub fn pull_args(&self, remote: &RemoteRef) -> Vec<String> {
        let mut args = self.base_args();
        args.push(remote.rsync_root());
        args.push(self.local_dir());
        args
    }

    async fn transfer(
        &self,
        args: Vec<String>,
        paths: &[PathBuf],
        action: String,
    ) -> Result<(), SyncError> {
        debug!(count = paths.len(), ?paths, "{action}");
        let mut cmd = tool_command(TOOL);
        cmd.args(args);
        match run_with_input(TOOL, &mut cmd, &nul_separated(paths)).await? {
            Some(0) => Ok(()),
            code => Err(SyncError::tool_failed(action, code)),
        }
    }
}

impl FileSync for RsyncTransfer {
    async fn push_paths(&self, remote: &RemoteRef, paths: &[PathBuf]) -> Result<(), SyncError> {
        let action = format!("rsync of local changes to {}", remote.address);
        self.transfer(self.push_args(remote), paths, action).await
    }

    async fn pull_paths(&self, remote: &RemoteRef, paths: &[PathBuf]) -> Result<(), SyncError> {
        let action = format!("rsync of return files from {}", remote.address);
        self.transfer(self.pull_args(remote), paths, action).await
    }
}

/// Directory argument with a trailing slash so rsync copies contents.
fn dir_arg(path: &Path) -> String {
    let mut dir = path.display().to_string();
    if !dir.ends_with('/') {
        dir.push('/');
    }
    dir
}
