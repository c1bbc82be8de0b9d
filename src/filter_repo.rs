//! Authorship rewriting through `git-filter-repo`.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::TransferError;
use crate::runner::{CommandRunner, Invocation, OnFailure, run_command};

/// Text printed by `git filter-repo -h` when the tool is installed.
pub const USAGE_BANNER: &str = "usage: git-filter-repo";

/// PyPI package providing the `git-filter-repo` command.
const PACKAGE: &str = "git-filter-repo";

/// The author/committer identity written onto every commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: &str, email: &str) -> Self {
        Identity {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        }
    }
}

/// Builds the `git filter-repo -h` call used to detect the tool.
///
/// `-h` is used instead of `--help`: git turns `git <cmd> --help` into a
/// man page lookup, which fails when the tool was installed through pip.
pub fn usage_check(repo: &Path) -> Invocation {
    Invocation::new("git").args(["filter-repo", "-h"]).in_dir(repo)
}

/// Picks an installer command from the first package manager `exists` finds.
pub fn install_invocation(exists: impl Fn(&str) -> bool) -> Option<Invocation> {
    if exists("pip") {
        Some(Invocation::new("pip").args(["install", PACKAGE]))
    } else if exists("pip3") {
        Some(Invocation::new("pip3").args(["install", PACKAGE]))
    } else if exists("python3") {
        Some(Invocation::new("python3").args(["-m", "pip", "install", PACKAGE]))
    } else {
        None
    }
}

/// Makes sure `git filter-repo` can be invoked, installing it if needed.
///
/// The install outcome is not verified; if it failed, the rewrite step
/// itself reports the error.
///
/// `exists` reports whether a program is on `PATH`; it picks the installer.
pub fn ensure_available<R: CommandRunner + ?Sized>(
    runner: &mut R,
    repo: &Path,
    exists: impl Fn(&str) -> bool,
) -> Result<(), TransferError> {
    tracing::info!("Checking for git-filter-repo...");
    let usage = run_command(runner, &usage_check(repo), OnFailure::Tolerated)?;
    if usage.contains(USAGE_BANNER) {
        return Ok(());
    }

    tracing::info!("git-filter-repo not found. Installing...");
    match install_invocation(exists) {
        Some(inv) => {
            run_command(runner, &inv, OnFailure::Tolerated)?;
        }
        None => {
            tracing::warn!("No Python package manager found; cannot install git-filter-repo.");
        }
    }
    Ok(())
}

/// Builds the `git filter-repo` call that stamps `identity` on every commit.
///
/// `--force` skips filter-repo's fresh-clone heuristic; the clone was made a
/// moment ago by this process. Replace refs are not kept, so the mirror push
/// only carries branches and tags.
pub fn rewrite_identity(repo: &Path, identity: &Identity) -> Invocation {
    Invocation::new("git")
        .args([
            "filter-repo",
            "--force",
            "--replace-refs",
            "delete-no-add",
            "--commit-callback",
        ])
        .arg(commit_callback(identity))
        .in_dir(repo)
}

/// Python body run by filter-repo for each commit.
pub fn commit_callback(identity: &Identity) -> String {
    let name = python_bytes_literal(&identity.name);
    let email = python_bytes_literal(&identity.email);
    format!(
        "commit.author_name = commit.committer_name = {name}; \
         commit.author_email = commit.committer_email = {email}"
    )
}

/// Encodes `s` as a Python bytes literal.
///
/// Quotes and backslashes are escaped and everything outside printable
/// ASCII becomes `\xNN`, so arbitrary input cannot escape the literal.
fn python_bytes_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 3);
    out.push_str("b'");
    for b in s.bytes() {
        match b {
            b'\'' => out.push_str("\\'"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }
    out.push('\'');
    out
}
