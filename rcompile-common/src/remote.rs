//! Remote locator: turns a git remote alias into an ssh address and a
//! filesystem path on that host.

use std::borrow::Cow;

use tracing::debug;

use crate::error::SyncError;
use crate::tools::VersionControl;

/// A git remote alias resolved to `<address>:<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// Name of the git remote, e.g. `compiler`.
    pub alias: String,
    /// Login and host handed to ssh, e.g. `build@host`.
    pub address: String,
    /// Repository path on the remote host, e.g. `/srv/repo`.
    pub path: String,
}

impl RemoteRef {
    /// Build a reference from the URL git has configured for `alias`.
    pub fn from_url(alias: &str, url: &str) -> Result<Self, SyncError> {
        let (address, path) =
            split_remote_url(url).ok_or_else(|| SyncError::InvalidRemoteUrl {
                alias: alias.to_string(),
                url: url.to_string(),
            })?;

        Ok(Self {
            alias: alias.to_string(),
            address: address.to_string(),
            path: path.to_string(),
        })
    }

    /// `address:path/` in the form rsync expects for a remote directory.
    ///
    /// rsync runs with `--protect-args`, so no remote shell expands `~`;
    /// a home-relative path is passed as a plain relative one instead.
    pub fn rsync_root(&self) -> String {
        let path = match self.path.as_str() {
            "/" => "",
            "~" => ".",
            other => other
                .strip_prefix("~/")
                .map(|rest| if rest.is_empty() { "." } else { rest })
                .unwrap_or(other)
                .trim_end_matches('/'),
        };
        format!("{}:{}/", self.address, path)
    }

    /// Repository path quoted for a remote POSIX shell.
    pub fn shell_path(&self) -> String {
        quote_remote_path(&self.path)
    }
}

/// Split `<login-and-host>:<path>` at the first colon.
///
/// The path side may itself contain colons. Both sides must be non-empty;
/// the shape of the address is left for ssh to judge.
pub fn split_remote_url(url: &str) -> Option<(&str, &str)> {
    let (address, path) = url.split_once(':')?;
    if address.is_empty() || path.is_empty() {
        return None;
    }
    Some((address, path))
}

/// Quote a remote path for `sh`, leaving a leading `~/` for the remote
/// shell to expand.
pub fn quote_remote_path(path: &str) -> String {
    if path == "~" {
        return path.to_string();
    }
    match path.strip_prefix("~/") {
        Some("") => "~/".to_string(),
        Some(rest) => format!("~/{}", shell_escape::escape(Cow::Borrowed(rest))),
        None => shell_escape::escape(Cow::Borrowed(path)).into_owned(),
    }
}

/// Look up `alias` in the local repository and resolve it.
///
/// Fails with [`SyncError::RemoteNotConfigured`] when git has no such
/// remote. Runs before anything touches the network.
pub async fn locate<V: VersionControl>(vcs: &V, alias: &str) -> Result<RemoteRef, SyncError> {
    let url = vcs
        .remote_url(alias)
        .await?
        .ok_or_else(|| SyncError::RemoteNotConfigured {
            alias: alias.to_string(),
        })?;
    debug!(alias, url = %url, "resolved remote url");
    RemoteRef::from_url(alias, &url)
}
