//! rcompile - run a command on a remote checkout of the local working tree.
//!
//! One run: resolve the git remote, force-push HEAD to the publish branch,
//! reset the remote checkout to it, copy uncommitted changes, run the
//! command over ssh, copy return files back. The first failure aborts.

#![forbid(unsafe_code)]

mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rcompile_common::config::{EnvReader, default_config_path, load_config, process_env};
use rcompile_common::{
    GitCli, LogConfig, Pipeline, RsyncTransfer, RunRequest, Settings, SshSession, SyncError,
    init_logging,
};
use tracing::{debug, warn};

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env("info");
    if let Err(err) = init_logging(&log_config) {
        eprintln!("rcompile: failed to initialize logging: {err}");
    }

    let code = tokio::select! {
        result = run(cli) => match result {
            Ok(()) => 0,
            Err(err) => report(&err),
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; the remote checkout may be left on the publish branch");
            SyncError::Interrupted.exit_code()
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    let env = EnvReader::new(process_env);

    let config_path: Option<PathBuf> = env.get_path("CONFIG").or_else(default_config_path);
    let file = match &config_path {
        Some(path) => load_config(path)?,
        None => Default::default(),
    };
    let settings = Settings::resolve(cli.remote, file, config_path, &env);
    debug!(
        alias = %settings.remote_alias.value,
        source = %settings.remote_alias.describe_source(),
        "remote alias"
    );

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let git = GitCli::discover(&cwd).await?;
    let ssh = SshSession::new(&settings.ssh);
    let rsync = RsyncTransfer::new(git.root(), &ssh, &settings.rsync);
    let pipeline = Pipeline::new(git, ssh, rsync, settings.pipeline());

    let request = RunRequest {
        alias: settings.remote_alias.value.clone(),
        return_files: cli.return_files,
        command: cli.command,
    };
    let snapshot = pipeline.run(&request).await?;
    debug!(
        commit = %snapshot.commit,
        dirty = snapshot.dirty_paths.len(),
        "run complete"
    );
    Ok(())
}

/// Map a failure to the process exit code, printing it unless it is the
/// remote command's own failure (its output already explains itself).
fn report(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SyncError>() {
        Some(sync_err @ SyncError::CommandFailed { .. }) => {
            debug!("{sync_err}");
            sync_err.exit_code()
        }
        Some(sync_err) => {
            eprintln!("rcompile: {err:#}");
            sync_err.exit_code()
        }
        None => {
            eprintln!("rcompile: {err:#}");
            1
        }
    }
}
