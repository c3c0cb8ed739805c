//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

const AFTER_HELP: &str = "\
The remote alias names a git remote whose URL has the form <login>:<path>.
Local HEAD is force-pushed to the publish branch on that remote, the remote
checkout is reset to it and cleaned, uncommitted local changes are copied
over, and COMMAND runs in <path>. Return files are copied back only when
COMMAND succeeds.

Environment:
  RCOMPILE_REMOTE   default remote alias (fallback: config file, then 'compiler')
  RCOMPILE_CONFIG   config file path
  RCOMPILE_LOG      log filter, e.g. 'debug'";

/// Options are only recognized before the command; the first token that is
/// not one of them starts the command, and everything from there on is
/// passed to the remote shell untouched.
#[derive(Parser, Debug)]
#[command(name = "rcompile")]
#[command(
    about = "Run a command on a remote checkout of the local working tree",
    disable_help_flag = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Print help
    #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,

    /// Git remote to build on
    #[arg(long, value_name = "ALIAS", allow_hyphen_values = true)]
    pub remote: Option<String>,

    /// Copy PATH (relative to the repository root) back after the command
    /// succeeds; repeatable
    #[arg(long = "return-file", value_name = "PATH", allow_hyphen_values = true)]
    pub return_files: Vec<PathBuf>,

    /// Command and arguments to run remotely
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}
