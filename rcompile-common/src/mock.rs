//! Recording fakes for the three tool seams.
//!
//! The fakes share a [`CallLog`] so tests can assert the exact order in
//! which the pipeline touched git, ssh and rsync without a network or a
//! remote host.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SyncError;
use crate::remote::RemoteRef;
use crate::tools::{FileSync, RemoteSession, VersionControl};

/// One observed tool interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RemoteUrl { alias: String },
    HeadCommit,
    ForcePush { alias: String, branch: String },
    DirtyPaths,
    Execute { address: String, script: String },
    PushPaths { destination: String, paths: Vec<PathBuf> },
    PullPaths { source: String, paths: Vec<PathBuf> },
}

/// Shared, ordered record of [`Call`]s.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Call) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Snapshot of everything recorded so far.
    pub fn calls(&self) -> Vec<Call> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True if anything was sent to the remote host.
    pub fn touched_remote(&self) -> bool {
        self.calls().iter().any(|call| {
            matches!(
                call,
                Call::ForcePush { .. } | Call::Execute { .. } | Call::PushPaths { .. }
            )
        })
    }
}

/// Fake local repository.
#[derive(Debug, Clone)]
pub struct MockVersionControl {
    remotes: HashMap<String, String>,
    head: String,
    dirty: Vec<PathBuf>,
    fail_push: bool,
    log: CallLog,
}

impl Default for MockVersionControl {
    fn default() -> Self {
        Self {
            remotes: HashMap::new(),
            head: "0123456789abcdef0123456789abcdef01234567".to_string(),
            dirty: Vec::new(),
            fail_push: false,
            log: CallLog::new(),
        }
    }
}

impl MockVersionControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remote(mut self, alias: impl Into<String>, url: impl Into<String>) -> Self {
        self.remotes.insert(alias.into(), url.into());
        self
    }

    pub fn with_head(mut self, commit: impl Into<String>) -> Self {
        self.head = commit.into();
        self
    }

    pub fn with_dirty<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dirty = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Make `force_push` fail as if the remote rejected it.
    pub fn push_failure(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }
}

impl VersionControl for MockVersionControl {
    async fn remote_url(&self, alias: &str) -> Result<Option<String>, SyncError> {
        self.log.record(Call::RemoteUrl {
            alias: alias.to_string(),
        });
        Ok(self.remotes.get(alias).cloned())
    }

    async fn head_commit(&self) -> Result<String, SyncError> {
        self.log.record(Call::HeadCommit);
        Ok(self.head.clone())
    }

    async fn force_push(&self, alias: &str, branch: &str) -> Result<(), SyncError> {
        self.log.record(Call::ForcePush {
            alias: alias.to_string(),
            branch: branch.to_string(),
        });
        if self.fail_push {
            return Err(SyncError::tool_failed(
                format!("git push to {alias}/{branch}"),
                Some(1),
            ));
        }
        Ok(())
    }

    async fn dirty_paths(&self) -> Result<Vec<PathBuf>, SyncError> {
        self.log.record(Call::DirtyPaths);
        Ok(self.dirty.clone())
    }
}

/// Fake ssh session answering each `execute` with the next queued exit
/// code, `Some(0)` once the queue is empty.
#[derive(Debug, Default)]
pub struct MockRemoteSession {
    exit_codes: Mutex<VecDeque<Option<i32>>>,
    log: CallLog,
}

impl MockRemoteSession {
    pub fn success() -> Self {
        Self::default()
    }

    /// Queue exit codes for successive sessions (checkout first, then the
    /// user command).
    pub fn with_exit_codes(self, codes: impl IntoIterator<Item = Option<i32>>) -> Self {
        *self
            .exit_codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = codes.into_iter().collect();
        self
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }
}

impl RemoteSession for MockRemoteSession {
    async fn execute(&self, address: &str, script: &str) -> Result<Option<i32>, SyncError> {
        self.log.record(Call::Execute {
            address: address.to_string(),
            script: script.to_string(),
        });
        let next = self
            .exit_codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next.unwrap_or(Some(0)))
    }
}

/// Fake rsync.
#[derive(Debug, Clone, Default)]
pub struct MockFileSync {
    fail_push: bool,
    fail_pull: bool,
    log: CallLog,
}

impl MockFileSync {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn push_failure(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// Fail retrieval, as rsync does when a return file is missing remotely.
    pub fn pull_failure(mut self) -> Self {
        self.fail_pull = true;
        self
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }
}

impl FileSync for MockFileSync {
    async fn push_paths(&self, remote: &RemoteRef, paths: &[PathBuf]) -> Result<(), SyncError> {
        self.log.record(Call::PushPaths {
            destination: remote.rsync_root(),
            paths: paths.to_vec(),
        });
        if self.fail_push {
            return Err(SyncError::tool_failed("rsync of local changes", Some(23)));
        }
        Ok(())
    }

    async fn pull_paths(&self, remote: &RemoteRef, paths: &[PathBuf]) -> Result<(), SyncError> {
        self.log.record(Call::PullPaths {
            source: remote.rsync_root(),
            paths: paths.to_vec(),
        });
        if self.fail_pull {
            return Err(SyncError::tool_failed("rsync of return files", Some(23)));
        }
        Ok(())
    }
}
