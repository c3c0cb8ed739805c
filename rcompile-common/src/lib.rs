//! Shared building blocks for rcompile.
//!
//! rcompile mirrors the local git working tree onto a remote checkout, runs
//! a command there and copies selected results back. This crate holds
//! everything except the CLI front end:
//!
//! - [`remote`]: resolving a git remote alias into an ssh address and path
//! - [`status`]: parsing the local dirty set out of `git status`
//! - [`tools`]: the `VersionControl` / `RemoteSession` / `FileSync` seams
//!   and their git, ssh and rsync implementations
//! - [`pipeline`]: the fail-fast stage runner tying them together
//! - [`config`], [`logging`], [`error`]: the ambient pieces

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod mock;
pub mod pipeline;
pub mod remote;
pub mod status;
pub mod tools;
pub mod util;

pub use config::{ConfigError, ConfigSource, FileConfig, Settings, Sourced};
pub use error::SyncError;
pub use logging::{LogConfig, init_logging};
pub use pipeline::{ExclusiveRemote, Pipeline, PipelineSettings, RemoteSnapshot, RunRequest};
pub use remote::RemoteRef;
pub use tools::{FileSync, GitCli, RemoteSession, RsyncTransfer, SshSession, VersionControl};

/// Branch on the remote that carries the local commit tip.
pub const DEFAULT_PUBLISH_BRANCH: &str = "remoteCompile";

/// Remote alias used when neither the CLI, the environment nor the config
/// file name one.
pub const DEFAULT_REMOTE_ALIAS: &str = "compiler";
