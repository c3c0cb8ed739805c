//! Configuration for rcompile.
//!
//! Values are layered, lowest precedence first:
//! - built-in defaults
//! - the TOML config file (`$RCOMPILE_CONFIG` or the platform config dir)
//! - `RCOMPILE_*` environment variables
//! - command-line options
//!
//! Every resolved value remembers where it came from so `RCOMPILE_LOG=debug`
//! can explain surprising choices.

pub mod env;
pub mod file;
pub mod settings;
pub mod source;

pub use env::{ENV_PREFIX, EnvReader, process_env};
pub use file::{ConfigError, FileConfig, RsyncSettings, SshSettings, default_config_path, load_config};
pub use settings::{DEFAULT_PROFILE, Settings};
pub use source::{ConfigSource, Sourced};
