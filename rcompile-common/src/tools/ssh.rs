//! `RemoteSession` backed by the OpenSSH client.

use super::RemoteSession;
use super::process::{run_inherited, tool_command};
use crate::config::SshSettings;
use crate::error::SyncError;

const TOOL: &str = "ssh";

/// Runs scripts on the remote through `ssh <options> <address> <script>`.
#[derive(Debug, Clone, Default)]
pub struct SshSession {
    options: Vec<String>,
}

impl SshSession {
    pub fn new(settings: &SshSettings) -> Self {
        Self {
            options: settings.args(),
        }
    }

    /// Full argument list after `ssh`.
    pub fn command_args(&self, address: &str, script: &str) -> Vec<String> {
        let mut args = self.options.clone();
        args.push(address.to_string());
        args.push(script.to_string());
        args
    }

    /// `-e` value for rsync so it reaches the host the same way.
    pub fn rsync_transport(&self) -> Option<String> {
        if self.options.is_empty() {
            return None;
        }
        let mut transport = String::from(TOOL);
        for option in &self.options {
            transport.push(' ');
            transport.push_str(&shell_escape::escape(option.as_str().into()));
        }
        Some(transport)
    }
}

impl RemoteSession for SshSession {
    async fn execute(&self, address: &str, script: &str) -> Result<Option<i32>, SyncError> {
        let mut cmd = tool_command(TOOL);
        cmd.args(self.command_args(address, script));
        run_inherited(TOOL, &mut cmd).await
    }
}
