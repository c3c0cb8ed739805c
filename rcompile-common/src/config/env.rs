//! `RCOMPILE_*` environment variables.
//!
//! Reads go through an injectable lookup so tests can supply variables
//! without touching the process environment.

use std::path::PathBuf;

use super::source::Sourced;

/// Prefix shared by every variable rcompile reads.
pub const ENV_PREFIX: &str = "RCOMPILE_";

/// Lookup backed by the real process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Reader for prefixed variables.
pub struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Full variable name for `name`, e.g. `REMOTE` -> `RCOMPILE_REMOTE`.
    pub fn var_name(name: &str) -> String {
        format!("{ENV_PREFIX}{name}")
    }

    /// Non-empty string value. An empty variable counts as unset.
    pub fn get_string(&self, name: &str) -> Option<Sourced<String>> {
        let var = Self::var_name(name);
        let value = (self.lookup)(&var)?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(Sourced::from_env(value.to_string(), var))
    }

    /// Path value with `~` expanded.
    pub fn get_path(&self, name: &str) -> Option<PathBuf> {
        self.get_string(name)
            .map(|s| PathBuf::from(shellexpand::tilde(&s.value).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSource;
    use std::collections::HashMap;

    fn reader(vars: &[(&str, &str)]) -> EnvReader<impl Fn(&str) -> Option<String>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvReader::new(move |key: &str| vars.get(key).cloned())
    }

    #[test]
    fn test_get_string_uses_prefix() {
        let env = reader(&[("RCOMPILE_REMOTE", "buildbox")]);
        let value = env.get_string("REMOTE").unwrap();
        assert_eq!(value.value, "buildbox");
        assert_eq!(value.source, ConfigSource::Environment);
        assert_eq!(value.origin.as_deref(), Some("RCOMPILE_REMOTE"));
    }

    #[test]
    fn test_empty_value_is_unset() {
        let env = reader(&[("RCOMPILE_REMOTE", "  ")]);
        assert!(env.get_string("REMOTE").is_none());
        assert!(env.get_string("CONFIG").is_none());
    }

    #[test]
    fn test_get_path() {
        let env = reader(&[("RCOMPILE_CONFIG", "/etc/rcompile.toml")]);
        assert_eq!(
            env.get_path("CONFIG"),
            Some(PathBuf::from("/etc/rcompile.toml"))
        );
    }
}
