use async_trait::async_trait;
use std::path::Path;

/// Version control operations needed to mirror a shared source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionControlClient: Send + Sync {
    /// Clone a repository from the given URL into `dest_path`
    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError>;

    /// Pull `branch` from `url` into the repository at `repo_path`
    async fn pull(&self, repo_path: &Path, url: &str, branch: &str) -> Result<(), ScmError>;

    /// Most recent commits of the repository at `repo_path`, newest first
    async fn log(&self, repo_path: &Path, max_count: usize)
        -> Result<Vec<CommitSummary>, ScmError>;

    /// Raw `ls-remote --heads origin` listing of the repository at `repo_path`
    async fn list_remote_heads(&self, repo_path: &Path) -> Result<String, ScmError>;

    /// Working tree status of the repository at `repo_path`
    async fn status(&self, repo_path: &Path) -> Result<WorkingTreeStatus, ScmError>;
}

/// A single commit as reported by `log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Full commit hash
    pub hash: String,
    /// First line of the commit message
    pub subject: String,
}

/// Result of a working tree status check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    /// Whether there are uncommitted or untracked changes
    pub has_changes: bool,
    /// Current branch, if not detached
    pub branch: Option<String>,
}

/// Extract the commit hash of the first head from an `ls-remote --heads` listing
///
/// Each line has the form `<hash>\trefs/heads/<name>`.
pub fn parse_remote_head(listing: &str) -> Option<String> {
    listing
        .lines()
        .map(str::trim)
        .find(|line| line.contains("refs/heads/"))
        .and_then(|line| line.split(|c: char| c == '\t' || c == ' ').next())
        .filter(|hash| !hash.is_empty())
        .map(str::to_string)
}

/// Errors that can occur during version control operations
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("Repository not found at path: {path}")]
    RepositoryNotFound { path: String },

    #[error("Clone operation failed: {message}")]
    CloneFailed { message: String },

    #[error("Pull operation failed: {message}")]
    PullFailed { message: String },

    #[error("Log query failed: {message}")]
    LogFailed { message: String },

    #[error("Remote listing failed: {message}")]
    ListRemoteFailed { message: String },

    #[error("Status check failed: {message}")]
    StatusFailed { message: String },

    #[error("SCM executable not found: {executable}")]
    ExecutableNotFound { executable: String },

    #[error("Command timed out after {timeout_secs}s: {command}")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Command execution failed: {command}, exit code: {exit_code}, stderr: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },
}

impl ScmError {
    /// Create a repository not found error
    pub fn repository_not_found(path: &Path) -> Self {
        Self::RepositoryNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create a clone failed error
    pub fn clone_failed(message: impl Into<String>) -> Self {
        Self::CloneFailed {
            message: message.into(),
        }
    }

    /// Create a pull failed error
    pub fn pull_failed(message: impl Into<String>) -> Self {
        Self::PullFailed {
            message: message.into(),
        }
    }

    /// Create a log failed error
    pub fn log_failed(message: impl Into<String>) -> Self {
        Self::LogFailed {
            message: message.into(),
        }
    }

    /// Create a remote listing failed error
    pub fn list_remote_failed(message: impl Into<String>) -> Self {
        Self::ListRemoteFailed {
            message: message.into(),
        }
    }

    /// Create a status failed error
    pub fn status_failed(message: impl Into<String>) -> Self {
        Self::StatusFailed {
            message: message.into(),
        }
    }

    /// Create an executable not found error
    pub fn executable_not_found(executable: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            executable: executable.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(command: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            command: command.into(),
            timeout_secs,
        }
    }

    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }
}
