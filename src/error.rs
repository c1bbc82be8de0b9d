use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a repository transfer.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Invalid repository URL: {0}")]
    InvalidUrl(String),

    #[error("Could not extract repository name from URL: {0}")]
    NoRepoName(String),

    #[error("`git` not found in PATH")]
    GitNotFound,

    #[error("{} already exists; refusing to clone over it", .0.display())]
    CloneDirExists(PathBuf),

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl TransferError {
    /// Validation errors are raised before anything touches the filesystem.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TransferError::InvalidUrl(_)
                | TransferError::NoRepoName(_)
                | TransferError::GitNotFound
                | TransferError::CloneDirExists(_)
        )
    }
}
