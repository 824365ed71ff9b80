use std::path::PathBuf;
use thiserror::Error;

/// Domain errors for gitx workflows. Each variant maps to a process exit
/// code: git failures propagate the child's status, everything else exits 1.
#[derive(Debug, Error)]
pub enum GitxError {
    #[error("invalid repository '{0}': expected 'org/name' or a full git URL")]
    InvalidRepoFormat(String),

    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("directory already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("repository root does not exist: {0} (run 'gitx clone' first)")]
    RepoRootMissing(PathBuf),

    #[error("could not determine a default branch (no 'main', 'master', or origin/HEAD)")]
    NoDefaultBranch,

    #[error("unsupported config key: {key}. Supported keys: {supported}")]
    UnsupportedConfigKey { key: String, supported: String },

    #[error("git {command} exited with status {status}")]
    GitOperationFailed { command: String, status: i32 },

    #[error("aborting: branch was not created")]
    BranchCreationDeclined,

    #[error("branch name must not be empty")]
    EmptyBranchName,
}

impl GitxError {
    /// The exit code this error should terminate the process with.
    /// Failed git operations mirror the child's exit status; validation and
    /// precondition failures are 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            GitxError::GitOperationFailed { status, .. } => *status,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_failure_mirrors_child_status() {
        let err = GitxError::GitOperationFailed {
            command: "clone".to_string(),
            status: 128,
        };
        assert_eq!(err.exit_code(), 128);
    }

    #[test]
    fn validation_errors_exit_one() {
        assert_eq!(GitxError::InvalidRepoFormat("x".into()).exit_code(), 1);
        assert_eq!(GitxError::BranchCreationDeclined.exit_code(), 1);
        assert_eq!(GitxError::NoDefaultBranch.exit_code(), 1);
        assert_eq!(
            GitxError::RepoRootMissing(PathBuf::from("/tmp/x")).exit_code(),
            1
        );
    }

    #[test]
    fn messages_name_the_offending_input() {
        let err = GitxError::InvalidRepoFormat("just-a-name".into());
        assert!(err.to_string().contains("just-a-name"));

        let err = GitxError::UnsupportedProvider("gitlab".into());
        assert!(err.to_string().contains("gitlab"));
    }
}
