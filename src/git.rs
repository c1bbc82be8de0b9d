use std::path::{Path, PathBuf};

use crate::error::TransferError;
use crate::runner::{CommandRunner, Invocation};
use crate::url::RepoUrl;

/// Remote registered on the local clone for the destination.
pub const DEFAULT_REMOTE: &str = "new-origin";

/// Verifies that `git` is available on `PATH` and returns its location.
///
/// # Errors
///
/// Returns [`TransferError::GitNotFound`] if `which` cannot resolve `git`.
pub fn ensure_git() -> Result<PathBuf, TransferError> {
    which::which("git").map_err(|_| TransferError::GitNotFound)
}

/// Reads `git config --get <key>`, returning an empty string when unset.
///
/// Used to prefill the identity prompts with the user's own settings.
pub fn config_get<R: CommandRunner + ?Sized>(runner: &mut R, key: &str) -> String {
    let inv = Invocation::new("git").args(["config", "--get", key]);
    let out = runner.execute(&inv);
    if out.success {
        out.stdout.trim().to_string()
    } else {
        String::new()
    }
}

/// Builds `git clone --bare <url> <target>`.
///
/// The clone is written to `target` rather than to git's default directory
/// so the caller always knows which path to remove afterwards.
///
/// # Examples
///
/// ```
/// use git_repo_transfer::{git, url::RepoUrl};
/// use std::path::Path;
///
/// let url = RepoUrl::parse("https://example.com/foo/bar.git").unwrap();
/// let inv = git::clone_bare(&url, Path::new("bar.git"));
/// assert_eq!(inv.to_string(), "git clone --bare https://example.com/foo/bar.git bar.git");
/// ```
pub fn clone_bare(url: &RepoUrl, target: &Path) -> Invocation {
    Invocation::new("git")
        .args(["clone", "--bare"])
        .arg(url.as_str())
        .arg(target.to_string_lossy())
}

/// Builds `git remote add <name> <url>`, run inside `repo`.
pub fn remote_add(repo: &Path, name: &str, url: &RepoUrl) -> Invocation {
    Invocation::new("git")
        .args(["remote", "add", name, url.as_str()])
        .in_dir(repo)
}

/// Builds `git push --mirror <remote>`, run inside `repo`.
///
/// Mirror mode pushes every ref under `refs/` and deletes refs on the
/// remote that do not exist locally.
pub fn push_mirror(repo: &Path, remote: &str) -> Invocation {
    Invocation::new("git")
        .args(["push", "--mirror", remote])
        .in_dir(repo)
}
