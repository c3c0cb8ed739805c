//! The staged, fail-fast run: locate, publish, layer local changes,
//! execute, retrieve.
//!
//! Every stage returns a `Result` and the first error ends the run. Nothing
//! is retried and nothing is rolled back; an interrupted or failed run may
//! leave the remote checked out on the publish branch.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::DEFAULT_PROFILE;
use crate::error::SyncError;
use crate::remote::{self, RemoteRef};
use crate::tools::{FileSync, RemoteSession, VersionControl};
use crate::util::mask_sensitive_command;
use crate::DEFAULT_PUBLISH_BRANCH;

/// Knobs the stages need beyond the tool adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Branch the local HEAD is force-pushed to.
    pub publish_branch: String,
    /// Remote profile sourced before the command; empty to skip.
    pub profile: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            publish_branch: DEFAULT_PUBLISH_BRANCH.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
        }
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub alias: String,
    /// Repository-relative paths fetched back after a successful command.
    pub return_files: Vec<PathBuf>,
    /// Command tokens, joined with spaces and handed to the remote shell
    /// without further quoting.
    pub command: Vec<String>,
}

/// Assertion that the caller is the only writer to a remote.
///
/// Synchronizing force-overwrites the publish branch and resets the remote
/// work tree. Two runs against the same remote at once corrupt each other;
/// nothing detects that. Constructing this token is the caller's promise
/// that it will not happen.
#[derive(Debug, Clone, Copy)]
pub struct ExclusiveRemote<'a> {
    remote: &'a RemoteRef,
}

impl<'a> ExclusiveRemote<'a> {
    pub fn assume(remote: &'a RemoteRef) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &'a RemoteRef {
        self.remote
    }
}

/// State of the remote after [`Pipeline::synchronize`]: the published
/// commit with the local dirty set layered on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSnapshot {
    pub remote: RemoteRef,
    pub branch: String,
    pub commit: String,
    pub dirty_paths: Vec<PathBuf>,
}

pub struct Pipeline<V, S, F> {
    vcs: V,
    session: S,
    sync: F,
    settings: PipelineSettings,
}

impl<V, S, F> Pipeline<V, S, F>
where
    V: VersionControl,
    S: RemoteSession,
    F: FileSync,
{
    pub fn new(vcs: V, session: S, sync: F, settings: PipelineSettings) -> Self {
        Self {
            vcs,
            session,
            sync,
            settings,
        }
    }

    /// Run every stage in order.
    pub async fn run(&self, request: &RunRequest) -> Result<RemoteSnapshot, SyncError> {
        let remote = self.locate(&request.alias).await?;
        let snapshot = self.synchronize(ExclusiveRemote::assume(&remote)).await?;
        self.execute(&snapshot, &request.command).await?;
        self.retrieve(&snapshot, &request.return_files).await?;
        Ok(snapshot)
    }

    /// Resolve the alias. Never touches the network.
    pub async fn locate(&self, alias: &str) -> Result<RemoteRef, SyncError> {
        remote::locate(&self.vcs, alias).await
    }

    /// Make the remote work tree identical to the local one: committed
    /// state via the publish branch, then uncommitted edits per path.
    pub async fn synchronize(
        &self,
        target: ExclusiveRemote<'_>,
    ) -> Result<RemoteSnapshot, SyncError> {
        let remote = target.remote();
        let commit = self.publish(remote).await?;
        let dirty_paths = self.layer_dirty_paths(remote).await?;

        Ok(RemoteSnapshot {
            remote: remote.clone(),
            branch: self.settings.publish_branch.clone(),
            commit,
            dirty_paths,
        })
    }

    async fn publish(&self, remote: &RemoteRef) -> Result<String, SyncError> {
        let branch = &self.settings.publish_branch;
        let commit = self.vcs.head_commit().await?;
        info!(
            "Publishing {} to {}/{}",
            short_commit(&commit),
            remote.alias,
            branch
        );
        self.vcs.force_push(&remote.alias, branch).await?;

        let script = checkout_script(remote, branch);
        debug!(address = %remote.address, script = %script, "resetting remote work tree");
        match self.session.execute(&remote.address, &script).await? {
            Some(0) => Ok(commit),
            code => Err(SyncError::tool_failed(
                format!("remote checkout of {branch} in {}", remote.path),
                code,
            )),
        }
    }

    async fn layer_dirty_paths(&self, remote: &RemoteRef) -> Result<Vec<PathBuf>, SyncError> {
        let paths = self.vcs.dirty_paths().await?;
        if paths.is_empty() {
            debug!("working tree clean, no local changes to sync");
            return Ok(paths);
        }

        info!("Syncing {} uncommitted path(s)", paths.len());
        self.sync.push_paths(remote, &paths).await?;
        Ok(paths)
    }

    /// Run the user command in the remote checkout. A non-zero exit is
    /// returned as [`SyncError::CommandFailed`] with the remote code.
    pub async fn execute(
        &self,
        snapshot: &RemoteSnapshot,
        command: &[String],
    ) -> Result<(), SyncError> {
        let remote = &snapshot.remote;
        let script = command_script(&self.settings.profile, remote, command);
        info!(
            "Running `{}` on {}",
            mask_sensitive_command(&command.join(" ")),
            remote.address
        );

        match self.session.execute(&remote.address, &script).await? {
            Some(0) => Ok(()),
            Some(code) => Err(SyncError::CommandFailed { code }),
            None => Err(SyncError::tool_failed("remote command", None)),
        }
    }

    /// Copy the return files back into the local repository root.
    pub async fn retrieve(
        &self,
        snapshot: &RemoteSnapshot,
        files: &[PathBuf],
    ) -> Result<(), SyncError> {
        if files.is_empty() {
            return Ok(());
        }
        for file in files {
            info!("Retrieving {}", file.display());
        }
        self.sync.pull_paths(&snapshot.remote, files).await
    }
}

/// Resolve the publish branch remotely, check it out detached and drop
/// every untracked and ignored file.
pub fn checkout_script(remote: &RemoteRef, branch: &str) -> String {
    let rev = shell_escape::escape(format!("refs/heads/{branch}^{{commit}}").into());
    format!(
        "cd {path} && rev=$(git rev-parse --verify {rev}) && \
         git checkout --quiet --force --detach \"$rev\" && git clean -ffdx",
        path = remote.shell_path(),
    )
}

/// Source the profile if readable, enter the repository, run the command.
///
/// The profile sits inside double quotes so `$HOME` and friends still
/// expand remotely.
pub fn command_script(profile: &str, remote: &RemoteRef, command: &[String]) -> String {
    let mut script = String::new();
    if !profile.is_empty() {
        let profile = escape_double_quoted(profile);
        script.push_str(&format!("if [ -r \"{profile}\" ]; then . \"{profile}\"; fi; "));
    }
    script.push_str(&format!("cd {} && {}", remote.shell_path(), command.join(" ")));
    script
}

/// Escape the characters that stay special inside `"..."`, except `$`.
fn escape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn short_commit(commit: &str) -> &str {
    commit.get(..12).unwrap_or(commit)
}
