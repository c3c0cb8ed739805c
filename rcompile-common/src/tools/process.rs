//! Child process helpers shared by the git, ssh and rsync adapters.
//!
//! Children are killed when their future is dropped, so cancelling a stage
//! (Ctrl-C) does not leave a transfer running in the background.

use std::process::{Output, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::util::mask_sensitive_command;

pub(crate) fn tool_command(program: &str) -> Command {
    let mut cmd = Command::new(program);
    cmd.kill_on_drop(true);
    cmd
}

/// Command line for logs, with credentials masked. The ssh script carries
/// the user command verbatim.
fn describe(cmd: &Command) -> String {
    let inner = cmd.as_std();
    let mut line = inner.get_program().to_string_lossy().into_owned();
    for arg in inner.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    mask_sensitive_command(&line)
}

/// Run with inherited stdio so the tool's own output streams live.
///
/// Returns the exit code, `None` when the child died from a signal.
pub(crate) async fn run_inherited(
    tool: &'static str,
    cmd: &mut Command,
) -> Result<Option<i32>, SyncError> {
    debug!(tool, command = %describe(cmd), "running");
    let status = cmd
        .stdin(Stdio::inherit())
        .status()
        .await
        .map_err(|source| SyncError::Io { tool, source })?;
    Ok(status.code())
}

/// Run capturing stdout. stderr is captured too unless the caller already
/// configured it.
pub(crate) async fn run_captured(tool: &'static str, cmd: &mut Command) -> Result<Output, SyncError> {
    debug!(tool, command = %describe(cmd), "running (captured)");
    cmd.stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| SyncError::Io { tool, source })
}

/// Run feeding `input` on stdin; stdout and stderr are inherited.
pub(crate) async fn run_with_input(
    tool: &'static str,
    cmd: &mut Command,
    input: &[u8],
) -> Result<Option<i32>, SyncError> {
    debug!(tool, command = %describe(cmd), input_bytes = input.len(), "running with stdin");
    let mut child = cmd
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|source| SyncError::Io { tool, source })?;

    let mut write_error = None;
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(err) = stdin.write_all(input).await {
            write_error = Some(err);
        }
        // Closing stdin ends the list.
        drop(stdin);
    }

    let status = child
        .wait()
        .await
        .map_err(|source| SyncError::Io { tool, source })?;

    match write_error {
        // The child exiting early explains the broken pipe; report its status.
        Some(err) if status.success() => Err(SyncError::Io { tool, source: err }),
        Some(err) => {
            warn!(tool, error = %err, "could not write full input");
            Ok(status.code())
        }
        None => Ok(status.code()),
    }
}
