//! Failure taxonomy for a run.

use thiserror::Error;

/// Exit code reported when the run is interrupted from the terminal.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Everything that can stop the pipeline.
///
/// Every variant is fatal: the pipeline stops at the first one and nothing
/// is retried.
#[derive(Debug, Error)]
pub enum SyncError {
    /// `git remote get-url` does not know the alias.
    #[error("remote '{alias}' is not configured in this repository")]
    RemoteNotConfigured { alias: String },

    /// The remote URL cannot be split into `<login>:<path>`.
    #[error("remote '{alias}' has unusable url '{url}' (expected <login>:<path>)")]
    InvalidRemoteUrl { alias: String, url: String },

    /// An external tool could not be started or talked to.
    #[error("failed to run {tool}: {source}")]
    Io {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// An external tool ran and reported failure.
    #[error("{action} failed ({})", describe_code(.code))]
    ToolFailed { action: String, code: Option<i32> },

    /// The user command ran on the remote and exited non-zero.
    #[error("remote command exited with status {code}")]
    CommandFailed { code: i32 },

    /// The operator interrupted the run.
    #[error("interrupted")]
    Interrupted,
}

impl SyncError {
    pub(crate) fn tool_failed(action: impl Into<String>, code: Option<i32>) -> Self {
        Self::ToolFailed {
            action: action.into(),
            code,
        }
    }

    /// Process exit code this failure maps to.
    ///
    /// The remote command's own status passes through unchanged so callers
    /// can script against it.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code } => *code,
            Self::Interrupted => INTERRUPTED_EXIT_CODE,
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
