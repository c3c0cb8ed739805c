//! Capability seams for the three external tools, and their real
//! implementations.
//!
//! The pipeline only talks to these traits, so tests drive it with the
//! recording fakes in [`crate::mock`] instead of a real remote host.

mod git;
mod process;
mod rsync;
mod ssh;

pub use git::GitCli;
pub use rsync::RsyncTransfer;
pub use ssh::SshSession;

use std::path::{Path, PathBuf};

use crate::error::SyncError;
use crate::remote::RemoteRef;
use crate::util::path_bytes;

/// Local version control queries and the publishing push.
#[allow(async_fn_in_trait)]
pub trait VersionControl {
    /// Configured URL of `alias`, `None` when no such remote exists.
    async fn remote_url(&self, alias: &str) -> Result<Option<String>, SyncError>;

    /// Commit id of the local HEAD.
    async fn head_commit(&self) -> Result<String, SyncError>;

    /// Force-push HEAD to `refs/heads/<branch>` on `alias`, overwriting it.
    async fn force_push(&self, alias: &str, branch: &str) -> Result<(), SyncError>;

    /// Modified, deleted and untracked-but-not-ignored paths, relative to
    /// the repository root.
    async fn dirty_paths(&self) -> Result<Vec<PathBuf>, SyncError>;
}

/// A shell on the remote host.
#[allow(async_fn_in_trait)]
pub trait RemoteSession {
    /// Run `script` through the remote login shell with stdio streaming
    /// live. Returns the remote exit code, `None` if the session was
    /// killed by a signal.
    async fn execute(&self, address: &str, script: &str) -> Result<Option<i32>, SyncError>;
}

/// Archive-preserving transfer of explicit path lists.
#[allow(async_fn_in_trait)]
pub trait FileSync {
    /// Copy `paths` from the local root to the remote repository. Listed
    /// paths that no longer exist locally are deleted remotely.
    async fn push_paths(&self, remote: &RemoteRef, paths: &[PathBuf]) -> Result<(), SyncError>;

    /// Copy `paths` from the remote repository into the local root,
    /// overwriting local copies.
    async fn pull_paths(&self, remote: &RemoteRef, paths: &[PathBuf]) -> Result<(), SyncError>;
}

/// Paths as a NUL-separated list for `--files-from` with `--from0`.
pub(crate) fn nul_separated<P: AsRef<Path>>(paths: &[P]) -> Vec<u8> {
    let mut out = Vec::new();
    for path in paths {
        out.extend_from_slice(&path_bytes(path.as_ref()));
        out.push(0);
    }
    out
}
