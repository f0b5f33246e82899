use super::scm_interface::{CommitSummary, ScmError, VersionControlClient, WorkingTreeStatus};
use crate::domain::value_objects::git_url::redact_url;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Git implementation of version control operations, driving the `git` executable
pub struct GitScm {
    git_executable: String,
    timeout: Option<Duration>,
}

impl Default for GitScm {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
            timeout: None,
        }
    }
}

impl GitScm {
    /// Create a new Git SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Git SCM instance with custom executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
            ..Self::default()
        }
    }

    /// Limit every git invocation to `timeout`; `None` waits indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if git executable is available
    pub async fn check_availability(&self) -> Result<(), ScmError> {
        let output = Command::new(&self.git_executable)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|_| ScmError::executable_not_found(&self.git_executable))?;

        if !output.status.success() {
            return Err(ScmError::executable_not_found(&self.git_executable));
        }

        Ok(())
    }

    /// Command line as shown in logs and errors, with credentials masked
    fn display_command(&self, args: &[&str]) -> String {
        let shown: Vec<String> = args.iter().map(|arg| redact_url(arg)).collect();
        format!("{} {}", self.git_executable, shown.join(" "))
    }

    /// Execute a git command in the given directory
    async fn execute_git_command(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<std::process::Output, ScmError> {
        let mut cmd = Command::new(&self.git_executable);
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!("Running {}", self.display_command(args));

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| ScmError::timeout(self.display_command(args), limit.as_secs()))?,
            None => cmd.output().await,
        };

        output.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ScmError::executable_not_found(&self.git_executable),
            _ => ScmError::from(e),
        })
    }

    /// Execute a git command and check for success
    async fn execute_git_command_checked(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
        secret: Option<&str>,
    ) -> Result<String, ScmError> {
        let output = self.execute_git_command(args, working_dir).await?;

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if let Some(url) = secret {
                stderr = stderr.replace(url, &redact_url(url));
            }
            return Err(ScmError::command_failed(
                self.display_command(args),
                output.status.code().unwrap_or(-1),
                stderr,
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Re-label a failed git invocation; timeouts and spawn errors pass through
    fn relabel(error: ScmError, wrap: fn(String) -> ScmError) -> ScmError {
        match error {
            ScmError::CommandFailed { .. } => wrap(error.to_string()),
            other => other,
        }
    }

    /// Refuse to run inside a directory that is not a repository root
    ///
    /// Without this, git would walk up and operate on an enclosing repository.
    fn ensure_repository(repo_path: &Path) -> Result<(), ScmError> {
        if repo_path.join(".git").exists() {
            Ok(())
        } else {
            Err(ScmError::repository_not_found(repo_path))
        }
    }
}

#[async_trait]
impl VersionControlClient for GitScm {
    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError> {
        let dest = dest_path
            .to_str()
            .ok_or_else(|| ScmError::clone_failed("Destination path is not valid UTF-8"))?;

        self.execute_git_command_checked(&["clone", "--", url, dest], None, Some(url))
            .await
            .map_err(|e| Self::relabel(e, ScmError::clone_failed))?;

        Ok(())
    }

    async fn pull(&self, repo_path: &Path, url: &str, branch: &str) -> Result<(), ScmError> {
        Self::ensure_repository(repo_path)?;

        self.execute_git_command_checked(
            &["pull", "--ff-only", url, branch],
            Some(repo_path),
            Some(url),
        )
        .await
        .map_err(|e| Self::relabel(e, ScmError::pull_failed))?;

        Ok(())
    }

    async fn log(
        &self,
        repo_path: &Path,
        max_count: usize,
    ) -> Result<Vec<CommitSummary>, ScmError> {
        Self::ensure_repository(repo_path)?;

        let count = max_count.to_string();
        let output = self
            .execute_git_command_checked(
                &["log", "-n", &count, "--format=%H%x09%s"],
                Some(repo_path),
                None,
            )
            .await
            .map_err(|e| Self::relabel(e, ScmError::log_failed))?;

        Ok(output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let (hash, subject) = line.split_once('\t').unwrap_or((line, ""));
                CommitSummary {
                    hash: hash.trim().to_string(),
                    subject: subject.to_string(),
                }
            })
            .collect())
    }

    async fn list_remote_heads(&self, repo_path: &Path) -> Result<String, ScmError> {
        Self::ensure_repository(repo_path)?;

        self.execute_git_command_checked(&["ls-remote", "--heads", "origin"], Some(repo_path), None)
            .await
            .map_err(|e| Self::relabel(e, ScmError::list_remote_failed))
    }

    async fn status(&self, repo_path: &Path) -> Result<WorkingTreeStatus, ScmError> {
        Self::ensure_repository(repo_path)?;

        let porcelain = self
            .execute_git_command_checked(
                &["--no-optional-locks", "status", "--porcelain"],
                Some(repo_path),
                None,
            )
            .await
            .map_err(|e| Self::relabel(e, ScmError::status_failed))?;

        let branch = self
            .execute_git_command_checked(&["branch", "--show-current"], Some(repo_path), None)
            .await
            .ok()
            .filter(|b| !b.is_empty());

        Ok(WorkingTreeStatus {
            has_changes: !porcelain.is_empty(),
            branch,
        })
    }
}
