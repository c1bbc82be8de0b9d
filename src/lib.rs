//! # git-repo-transfer
//!
//! A CLI tool that moves a Git repository, with all of its branches and tags,
//! to a new remote while rewriting the author of every commit.
//!
//! The work is delegated to external tools:
//! - `git clone --bare` fetches the full history into a temporary directory
//! - `git filter-repo` replaces author and committer on every commit
//! - `git push --mirror` makes the destination an exact copy
//!
//! The temporary clone is removed whether the transfer succeeds or not.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive: prompts for both URLs and the new identity
//! git-repo-transfer
//!
//! # Non-interactive
//! git-repo-transfer --source https://example.com/old/app.git \
//!     --destination git@example.org:new/app.git \
//!     --name "Jane Doe" --email jane@example.com --yes
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface and main entry point
//! - [`transfer`] - The clone/rewrite/push workflow and its cleanup
//! - [`runner`] - External command execution
//! - [`git`] - Git command builders
//! - [`filter_repo`] - `git-filter-repo` detection, install and rewrite
//! - [`url`] - Repository URL validation and name extraction
//! - [`prompt`] - User input abstractions
//! - [`banner`] - Transfer summary banner
//! - [`logging`] - `tracing` subscriber setup
//! - [`error`] - Error type

pub mod banner;
pub mod cli;
pub mod error;
pub mod filter_repo;
pub mod git;
pub mod logging;
pub mod prompt;
pub mod runner;
pub mod transfer;
pub mod url;
