use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A scratch git repository plus an isolated environment for running the
/// rcompile binary against it.
pub struct TestRepo {
    pub dir: TempDir,
    /// Config file path handed to the binary; never created.
    pub config: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        crate::test_log!("FIXTURE: Creating scratch git repository");

        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = dir.path().join("no-such-config.toml");
        let repo = Self { dir, config };
        repo.git(&["init", "-q"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git(&self, args: &[&str]) -> Output {
        let output = Command::new("git")
            .arg("-C")
            .arg(self.path())
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    pub fn add_remote(&self, alias: &str, url: &str) {
        self.git(&["remote", "add", alias, url]);
    }

    /// Run rcompile in the repository with a clean rcompile environment.
    pub fn rcompile(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_rcompile"))
            .current_dir(self.path())
            .args(args)
            .env_remove("RCOMPILE_REMOTE")
            .env("RCOMPILE_CONFIG", &self.config)
            .env("RCOMPILE_LOG", "info")
            .output()
            .expect("Failed to run rcompile")
    }
}
