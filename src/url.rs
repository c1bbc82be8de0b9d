use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::TransferError;

/// Prefixes accepted as Git remotes.
///
/// Other transports (`ssh://`, `file://`, plain paths) are rejected even
/// though `git` itself understands them.
pub const ACCEPTED_PREFIXES: [&str; 3] = ["http://", "https://", "git@"];

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)([^/]+?)(\.git)?$").expect("name pattern is valid"));

/// A validated repository reference.
///
/// Construction through [`RepoUrl::parse`] guarantees the URL carries one of
/// the [`ACCEPTED_PREFIXES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl(String);

impl RepoUrl {
    /// Validates `raw` (after trimming) and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidUrl`] when the URL does not start with
    /// `http://`, `https://` or `git@`.
    pub fn parse(raw: &str) -> Result<Self, TransferError> {
        let url = raw.trim();
        if ACCEPTED_PREFIXES.iter().any(|p| url.starts_with(p)) {
            Ok(RepoUrl(url.to_string()))
        } else {
            Err(TransferError::InvalidUrl(url.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the local repository name from the last path segment.
    ///
    /// A trailing `.git` is stripped. URLs without a path after the host,
    /// or ending in `/`, yield [`TransferError::NoRepoName`].
    ///
    /// ```
    /// use git_repo_transfer::url::RepoUrl;
    ///
    /// let url = RepoUrl::parse("https://example.com/foo/bar.git").unwrap();
    /// assert_eq!(url.repo_name().unwrap(), "bar");
    /// ```
    pub fn repo_name(&self) -> Result<String, TransferError> {
        extract_repo_name(&self.0).ok_or_else(|| TransferError::NoRepoName(self.0.clone()))
    }
}

impl fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the path portion of a remote URL, i.e. whatever follows the host.
fn remote_path(url: &str) -> Option<&str> {
    if let Some(rest) = url.strip_prefix("git@") {
        // scp-like syntax: git@host:owner/name.git
        return rest.split_once(':').map(|(_, path)| path);
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    rest.split_once('/').map(|(_, path)| path)
}

fn extract_repo_name(url: &str) -> Option<String> {
    let path = remote_path(url)?;
    let caps = NAME_RE.captures(path)?;
    let name = caps.get(1)?.as_str();

    match name {
        "" | "." | ".." | ".git" => None,
        _ => Some(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{RepoUrl, extract_repo_name};
    use crate::error::TransferError;

    #[test]
    fn accepts_known_prefixes() {
        for url in [
            "http://example.com/a/b.git",
            "https://example.com/a/b.git",
            "git@github.com:a/b.git",
        ] {
            assert!(RepoUrl::parse(url).is_ok(), "{url} should be accepted");
        }
    }

    #[test]
    fn rejects_other_schemes() {
        for url in [
            "ssh://git@example.com/a/b.git",
            "ftp://example.com/a/b.git",
            "file:///tmp/b.git",
            "/tmp/b.git",
            "example.com/a/b",
            "",
            "HTTPS://example.com/a/b.git",
        ] {
            match RepoUrl::parse(url) {
                Err(TransferError::InvalidUrl(u)) => assert_eq!(u, url),
                other => panic!("{url} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let url = RepoUrl::parse("  https://example.com/a/b.git\n").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a/b.git");
    }

    #[test]
    fn name_with_and_without_git_suffix() {
        assert_eq!(
            extract_repo_name("https://example.com/foo/bar.git").as_deref(),
            Some("bar")
        );
        assert_eq!(
            extract_repo_name("https://example.com/foo/bar").as_deref(),
            Some("bar")
        );
        assert_eq!(
            extract_repo_name("http://example.com/bar").as_deref(),
            Some("bar")
        );
    }

    #[test]
    fn name_from_scp_like_urls() {
        assert_eq!(
            extract_repo_name("git@github.com:owner/proj.git").as_deref(),
            Some("proj")
        );
        assert_eq!(
            extract_repo_name("git@host:proj.git").as_deref(),
            Some("proj")
        );
    }

    #[test]
    fn only_trailing_git_suffix_is_stripped() {
        assert_eq!(
            extract_repo_name("https://example.com/me/me.github.io.git").as_deref(),
            Some("me.github.io")
        );
    }

    #[test]
    fn host_only_and_trailing_slash_fail_closed() {
        assert_eq!(extract_repo_name("https://example.com"), None);
        assert_eq!(extract_repo_name("https://example.com/"), None);
        assert_eq!(extract_repo_name("https://example.com/foo/bar/"), None);
        assert_eq!(extract_repo_name("https://example.com/foo/.git"), None);
        assert_eq!(extract_repo_name("git@github.com"), None);
    }

    #[test]
    fn repo_name_error_carries_url() {
        let url = RepoUrl::parse("https://example.com/").unwrap();
        match url.repo_name() {
            Err(TransferError::NoRepoName(u)) => assert_eq!(u, "https://example.com/"),
            other => panic!("expected NoRepoName, got {other:?}"),
        }
    }
}
