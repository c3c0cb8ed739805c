//! `VersionControl` backed by the git command line.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::debug;

use super::VersionControl;
use super::process::{run_captured, run_inherited, tool_command};
use crate::error::SyncError;
use crate::status::parse_porcelain_z;

const TOOL: &str = "git";

/// The local repository, addressed by its top-level directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Find the work tree containing `dir`.
    pub async fn discover(dir: &Path) -> Result<Self, SyncError> {
        let mut cmd = tool_command(TOOL);
        cmd.arg("-C")
            .arg(dir)
            .args(["rev-parse", "--show-toplevel"])
            .stderr(Stdio::inherit());
        let output = run_captured(TOOL, &mut cmd).await?;
        if !output.status.success() {
            return Err(SyncError::tool_failed(
                format!("locating git work tree from {}", dir.display()),
                output.status.code(),
            ));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(root = %root, "found repository root");
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self) -> tokio::process::Command {
        let mut cmd = tool_command(TOOL);
        cmd.arg("-C").arg(&self.root);
        cmd
    }
}

impl VersionControl for GitCli {
    async fn remote_url(&self, alias: &str) -> Result<Option<String>, SyncError> {
        let mut cmd = self.git();
        cmd.args(["remote", "get-url", "--"]).arg(alias);
        let output = run_captured(TOOL, &mut cmd).await?;
        if !output.status.success() {
            debug!(
                alias,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git remote get-url failed"
            );
            return Ok(None);
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!url.is_empty()).then_some(url))
    }

    async fn head_commit(&self) -> Result<String, SyncError> {
        let mut cmd = self.git();
        cmd.args(["rev-parse", "--verify", "HEAD"])
            .stderr(Stdio::inherit());
        let output = run_captured(TOOL, &mut cmd).await?;
        if !output.status.success() {
            return Err(SyncError::tool_failed(
                "resolving local HEAD",
                output.status.code(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn force_push(&self, alias: &str, branch: &str) -> Result<(), SyncError> {
        let mut cmd = self.git();
        cmd.args(["push", "--force", "--"])
            .arg(alias)
            .arg(format!("HEAD:refs/heads/{branch}"));
        match run_inherited(TOOL, &mut cmd).await? {
            Some(0) => Ok(()),
            code => Err(SyncError::tool_failed(
                format!("git push to {alias}/{branch}"),
                code,
            )),
        }
    }

    async fn dirty_paths(&self) -> Result<Vec<PathBuf>, SyncError> {
        let mut cmd = tool_command(TOOL);
        cmd.arg("--no-optional-locks")
            .arg("-C")
            .arg(&self.root)
            .args(["status", "--porcelain", "-z", "--untracked-files=all"])
            .stderr(Stdio::inherit());
        let output = run_captured(TOOL, &mut cmd).await?;
        if !output.status.success() {
            return Err(SyncError::tool_failed("git status", output.status.code()));
        }
        Ok(parse_porcelain_z(&output.stdout))
    }
}
