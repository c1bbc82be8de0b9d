//! The transfer workflow: clone, rewrite, push, clean up.
//!
//! Every external call goes through a [`CommandRunner`], and each step only
//! runs once the previous one succeeded:
//!
//! ```text
//! Validated -> Cloned -> ToolReady -> Rewritten -> RemoteAdded -> Pushed
//! ```
//!
//! Whatever happens after validation, the local bare clone is removed before
//! [`transfer`] returns.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TransferError;
use crate::filter_repo::{self, Identity};
use crate::git;
use crate::runner::{CommandRunner, OnFailure, run_command};
use crate::url::RepoUrl;

/// Last step that completed, reported when a later one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validated,
    Cloned,
    ToolReady,
    Rewritten,
    RemoteAdded,
    Pushed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Validated => "validated",
            Stage::Cloned => "cloned",
            Stage::ToolReady => "tool ready",
            Stage::Rewritten => "rewritten",
            Stage::RemoteAdded => "remote added",
            Stage::Pushed => "pushed",
        };
        f.write_str(s)
    }
}

/// A validated transfer, ready to run.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub source: RepoUrl,
    pub destination: RepoUrl,
    pub identity: Identity,
    pub repo_name: String,
    /// `<workdir>/<repo_name>.git`
    pub clone_dir: PathBuf,
    pub remote: String,
}

impl TransferPlan {
    /// Derives the repository name and the clone location under `workdir`.
    ///
    /// Nothing is created on disk. Fails if the clone directory already
    /// exists, since cleanup would otherwise delete something this run
    /// did not create.
    pub fn new(
        source: RepoUrl,
        destination: RepoUrl,
        identity: Identity,
        workdir: &Path,
    ) -> Result<Self, TransferError> {
        let repo_name = source.repo_name()?;

        let clone_dir = workdir.join(format!("{}.git", repo_name));
        if clone_dir.exists() {
            return Err(TransferError::CloneDirExists(clone_dir));
        }

        Ok(TransferPlan {
            source,
            destination,
            identity,
            repo_name,
            clone_dir,
            remote: String::from(git::DEFAULT_REMOTE),
        })
    }

    pub fn with_remote(mut self, remote: &str) -> Self {
        self.remote = remote.to_string();
        self
    }
}

/// Owns the local bare clone and deletes it when dropped.
///
/// Removal is best effort: a directory that never got created, or is
/// already gone, is not an error.
pub struct WorkingClone {
    path: PathBuf,
}

impl WorkingClone {
    pub fn new(path: &Path) -> Self {
        WorkingClone {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkingClone {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed local clone"),
            Err(e) => tracing::debug!(path = %self.path.display(), error = %e, "local clone not removed"),
        }
    }
}

/// Runs the full transfer described by `plan`.
///
/// The clone directory has already been removed when this returns,
/// whether or not the transfer succeeded.
pub fn transfer<R: CommandRunner + ?Sized>(
    runner: &mut R,
    plan: &TransferPlan,
) -> Result<(), TransferError> {
    let mut stage = Stage::Validated;
    let result = {
        let clone = WorkingClone::new(&plan.clone_dir);
        run_steps(runner, plan, clone.path(), &mut stage)
        // `clone` drops here, before the final status line.
    };

    match result {
        Ok(()) => {
            tracing::info!("✅ Repository transfer complete!");
            Ok(())
        }
        Err(e) => {
            tracing::error!("An error occurred after stage '{}': {}", stage, e);
            tracing::info!("Repository transfer aborted; local clone removed.");
            Err(e)
        }
    }
}

fn run_steps<R: CommandRunner + ?Sized>(
    runner: &mut R,
    plan: &TransferPlan,
    repo: &Path,
    stage: &mut Stage,
) -> Result<(), TransferError> {
    tracing::info!("Cloning the repository...");
    run_command(runner, &git::clone_bare(&plan.source, repo), OnFailure::Fatal)?;
    *stage = Stage::Cloned;

    filter_repo::ensure_available(runner, repo, |prog| which::which(prog).is_ok())?;
    *stage = Stage::ToolReady;

    tracing::info!("Rewriting commit authorship...");
    let rewrite = filter_repo::rewrite_identity(repo, &plan.identity);
    run_command(runner, &rewrite, OnFailure::Fatal)?;
    *stage = Stage::Rewritten;

    tracing::info!("Adding new repository remote...");
    let add = git::remote_add(repo, &plan.remote, &plan.destination);
    run_command(runner, &add, OnFailure::Fatal)?;
    *stage = Stage::RemoteAdded;

    tracing::info!("Pushing all branches and tags to the new repository...");
    run_command(runner, &git::push_mirror(repo, &plan.remote), OnFailure::Fatal)?;
    *stage = Stage::Pushed;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{RecordingRunner, fail, ok};
    use crate::runner::{CommandOutput, Invocation};

    const SOURCE: &str = "https://example.com/foo/bar.git";
    const DEST: &str = "git@example.org:team/bar.git";

    fn identity() -> Identity {
        Identity::new("Jane Doe", "jane@example.com")
    }

    fn plan_in(workdir: &Path) -> Result<TransferPlan, TransferError> {
        TransferPlan::new(
            RepoUrl::parse(SOURCE).unwrap(),
            RepoUrl::parse(DEST).unwrap(),
            identity(),
            workdir,
        )
    }

    /// Fakes git: `clone` creates the target directory, `filter-repo -h`
    /// prints the usage banner, and `failing` (if any) exits non-zero.
    fn fake_git(failing: Option<&'static str>) -> impl FnMut(&Invocation) -> CommandOutput {
        move |inv| {
            let sub = inv.args.first().map(String::as_str).unwrap_or("");
            if inv.args.get(1).map(String::as_str) == Some("-h") {
                return ok("usage: git-filter-repo [-h]");
            }
            if failing == Some(sub) {
                return fail("simulated failure");
            }
            if sub == "clone" {
                let target = PathBuf::from(inv.args.last().unwrap());
                fs::create_dir_all(target.join("refs")).unwrap();
            }
            ok("")
        }
    }

    #[test]
    fn plan_derives_clone_dir_from_repo_name() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = plan_in(tmp.path()).unwrap();
        assert_eq!(plan.repo_name, "bar");
        assert_eq!(plan.clone_dir, tmp.path().join("bar.git"));
        assert_eq!(plan.remote, "new-origin");
    }

    #[test]
    fn plan_rejects_source_without_repo_name() {
        let tmp = tempfile::tempdir().unwrap();
        let e = TransferPlan::new(
            RepoUrl::parse("https://example.com/").unwrap(),
            RepoUrl::parse(DEST).unwrap(),
            identity(),
            tmp.path(),
        );
        assert!(matches!(e, Err(TransferError::NoRepoName(_))));
    }

    #[test]
    fn plan_refuses_existing_clone_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("bar.git")).unwrap();
        let e = plan_in(tmp.path());
        assert!(matches!(e, Err(TransferError::CloneDirExists(_))));
        assert!(tmp.path().join("bar.git").exists());
    }

    #[test]
    fn successful_transfer_runs_steps_in_order_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = plan_in(tmp.path()).unwrap();
        let mut runner = RecordingRunner::new(fake_git(None));

        transfer(&mut runner, &plan).unwrap();

        let steps: Vec<(String, String)> = runner
            .calls
            .iter()
            .map(|c| (c.program.clone(), c.args[0].clone()))
            .collect();
        let git = |s: &str| (String::from("git"), s.to_string());
        assert_eq!(
            steps,
            vec![
                git("clone"),
                git("filter-repo"),
                git("filter-repo"),
                git("remote"),
                git("push")
            ]
        );
        assert_eq!(runner.calls[4].args, vec!["push", "--mirror", "new-origin"]);
        for call in &runner.calls[1..] {
            assert_eq!(call.dir.as_deref(), Some(plan.clone_dir.as_path()));
        }
        assert!(!plan.clone_dir.exists());
    }

    #[test]
    fn failed_rewrite_skips_push_and_removes_clone() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = plan_in(tmp.path()).unwrap();
        let mut fallback = fake_git(None);
        let mut runner = RecordingRunner::new(move |inv| {
            if inv.args.iter().any(|a| a == "--commit-callback") {
                fail("rewrite exploded")
            } else {
                fallback(inv)
            }
        });

        let err = transfer(&mut runner, &plan).unwrap_err();
        assert!(matches!(err, TransferError::CommandFailed { .. }));
        assert!(!runner.command_lines().iter().any(|c| c.starts_with("git push")));
        assert!(!runner.command_lines().iter().any(|c| c.starts_with("git remote")));
        assert!(!plan.clone_dir.exists());
    }

    #[test]
    fn failed_clone_stops_immediately() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = plan_in(tmp.path()).unwrap();
        let mut runner = RecordingRunner::new(fake_git(Some("clone")));

        assert!(transfer(&mut runner, &plan).is_err());
        assert_eq!(runner.calls.len(), 1);
        assert!(!plan.clone_dir.exists());
    }

    #[test]
    fn failed_push_still_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = plan_in(tmp.path()).unwrap();
        let mut runner = RecordingRunner::new(fake_git(Some("push")));

        match transfer(&mut runner, &plan) {
            Err(TransferError::CommandFailed { command, stderr }) => {
                assert_eq!(command, "git push --mirror new-origin");
                assert_eq!(stderr, "simulated failure");
            }
            other => panic!("expected push failure, got {other:?}"),
        }
        assert!(!plan.clone_dir.exists());
    }

    #[test]
    fn custom_remote_name_is_used_for_add_and_push() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = plan_in(tmp.path())
            .unwrap()
            .with_remote("dest");
        let mut runner = RecordingRunner::new(fake_git(None));

        transfer(&mut runner, &plan).unwrap();
        let lines = runner.command_lines();
        assert!(lines.contains(&format!("git remote add dest {}", DEST)));
        assert!(lines.contains(&String::from("git push --mirror dest")));
    }

    #[test]
    fn working_clone_drop_tolerates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("never-created.git");
        drop(WorkingClone::new(&path));
        assert!(!path.exists());
    }
}
