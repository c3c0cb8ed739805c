//! Small helpers shared by the pipeline and the CLI.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Variable-name suffixes whose values are hidden in logs.
const SECRET_SUFFIXES: &[&str] = &["TOKEN", "SECRET", "PASSWORD", "PASS", "API_KEY", "PRIVATE_KEY"];

/// Flags whose following value (or `=value`) is hidden in logs.
const SECRET_FLAGS: &[&str] = &["--token", "--password", "--api-key", "--secret"];

/// Mask credentials in a command line before it is logged.
///
/// Handles `NAME=value` assignments whose name ends in a secret-looking
/// suffix and `--flag value` / `--flag=value` pairs. Quoted values are
/// masked as a whole.
pub fn mask_sensitive_command(cmd: &str) -> String {
    let mut out = String::with_capacity(cmd.len());
    let mut mask_next = false;
    let mut rest = cmd;

    while !rest.is_empty() {
        let ws = rest.len() - rest.trim_start().len();
        out.push_str(&rest[..ws]);
        rest = &rest[ws..];
        if rest.is_empty() {
            break;
        }

        let end = word_end(rest);
        let word = &rest[..end];
        rest = &rest[end..];

        if mask_next {
            out.push_str("***");
            mask_next = false;
        } else if let Some(masked) = mask_word(word) {
            out.push_str(&masked);
        } else {
            mask_next = SECRET_FLAGS.contains(&word);
            out.push_str(word);
        }
    }

    out
}

fn mask_word(word: &str) -> Option<String> {
    let (key, _) = word.split_once('=')?;
    let upper = key.to_ascii_uppercase();
    let is_secret = SECRET_FLAGS.contains(&key)
        || (is_env_name(key) && SECRET_SUFFIXES.iter().any(|s| upper.ends_with(s)));
    is_secret.then(|| format!("{key}=***"))
}

fn is_env_name(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Byte length of the shell word at the start of `s`, honouring quotes and
/// backslash escapes.
fn word_end(s: &str) -> usize {
    let mut quote = None;
    let mut escaped = false;
    for (idx, c) in s.char_indices() {
        match (quote, c) {
            _ if escaped => escaped = false,
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, c) if c.is_whitespace() => return idx,
            _ => {}
        }
    }
    s.len()
}

/// Path for raw bytes as git prints them. Unix file names are arbitrary
/// bytes and are kept as they are.
#[cfg(unix)]
pub fn path_from_bytes(raw: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(raw))
}

#[cfg(not(unix))]
pub fn path_from_bytes(raw: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(raw).into_owned())
}

/// Raw bytes of `path`, the inverse of [`path_from_bytes`].
#[cfg(unix)]
pub fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
pub fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}
