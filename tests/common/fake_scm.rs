//! ファイルシステム上で動作するgitのテストダブル
//!
//! クローンではリモートのファイルと `.git` を書き出し、pullでは既存の
//! `.git` を前提に内容を上書きする。実際のgitと同様に、空でない
//! ディレクトリへのクローンは失敗する。

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use neox::infrastructure::scm::{CommitSummary, ScmError, VersionControlClient, WorkingTreeStatus};

const HEAD_FILE: &str = "HEAD";
const ORIGIN_FILE: &str = "origin";

/// リモートリポジトリの内容
#[derive(Debug, Clone)]
pub struct FakeRemote {
    pub head: String,
    pub files: Vec<(String, String)>,
}

/// 呼び出しを記録するgitクライアント
#[derive(Default)]
pub struct FakeScm {
    remotes: Mutex<HashMap<String, FakeRemote>>,
    calls: Mutex<Vec<String>>,
}

impl FakeScm {
    pub fn new() -> Self {
        Self::default()
    }

    /// リモートを登録する
    pub fn with_remote(self, url: &str, head: &str, files: &[(&str, &str)]) -> Self {
        self.set_remote(url, head, files);
        self
    }

    /// リモートの内容を差し替える（新しいコミットのpushに相当）
    pub fn set_remote(&self, url: &str, head: &str, files: &[(&str, &str)]) {
        let remote = FakeRemote {
            head: head.to_string(),
            files: files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
        };
        self.remotes.lock().unwrap().insert(url.to_string(), remote);
    }

    /// 記録された呼び出し（`clone <url>` 等）
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn remote(&self, url: &str) -> Option<FakeRemote> {
        self.remotes.lock().unwrap().get(url).cloned()
    }

    fn materialize(dest: &Path, url: &str, remote: &FakeRemote) -> std::io::Result<()> {
        for (path, content) in &remote.files {
            let file = dest.join(path);
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(file, content)?;
        }
        let git_dir = dest.join(".git");
        fs::create_dir_all(&git_dir)?;
        fs::write(git_dir.join(HEAD_FILE), &remote.head)?;
        fs::write(git_dir.join(ORIGIN_FILE), url)?;
        Ok(())
    }

    fn ensure_repository(repo_path: &Path) -> Result<(), ScmError> {
        if repo_path.join(".git").is_dir() {
            Ok(())
        } else {
            Err(ScmError::repository_not_found(repo_path))
        }
    }
}

#[async_trait]
impl VersionControlClient for FakeScm {
    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError> {
        self.record(format!("clone {}", url));

        let not_empty = fs::read_dir(dest_path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if not_empty {
            return Err(ScmError::clone_failed(format!(
                "destination path '{}' already exists and is not an empty directory",
                dest_path.display()
            )));
        }

        let remote = self
            .remote(url)
            .ok_or_else(|| ScmError::clone_failed(format!("repository '{}' not found", url)))?;
        Self::materialize(dest_path, url, &remote)?;
        Ok(())
    }

    async fn pull(&self, repo_path: &Path, url: &str, branch: &str) -> Result<(), ScmError> {
        self.record(format!("pull {} {}", url, branch));
        Self::ensure_repository(repo_path)?;

        if branch != "main" {
            return Err(ScmError::pull_failed(format!(
                "couldn't find remote ref {}",
                branch
            )));
        }
        let remote = self
            .remote(url)
            .ok_or_else(|| ScmError::pull_failed(format!("repository '{}' not found", url)))?;
        Self::materialize(repo_path, url, &remote)?;
        Ok(())
    }

    async fn log(
        &self,
        repo_path: &Path,
        _max_count: usize,
    ) -> Result<Vec<CommitSummary>, ScmError> {
        self.record(format!("log {}", repo_path.display()));
        Self::ensure_repository(repo_path)?;

        let hash = fs::read_to_string(repo_path.join(".git").join(HEAD_FILE))?;
        Ok(vec![CommitSummary {
            hash: hash.trim().to_string(),
            subject: "fake commit".to_string(),
        }])
    }

    async fn list_remote_heads(&self, repo_path: &Path) -> Result<String, ScmError> {
        self.record(format!("ls-remote {}", repo_path.display()));
        Self::ensure_repository(repo_path)?;

        let origin = fs::read_to_string(repo_path.join(".git").join(ORIGIN_FILE))?;
        let remote = self
            .remote(origin.trim())
            .ok_or_else(|| ScmError::list_remote_failed("could not read from remote repository"))?;
        Ok(format!(
            "{}\trefs/heads/main\n{}\trefs/heads/develop\n",
            remote.head, "0000000000000000000000000000000000000000"
        ))
    }

    async fn status(&self, repo_path: &Path) -> Result<WorkingTreeStatus, ScmError> {
        Self::ensure_repository(repo_path)?;
        Ok(WorkingTreeStatus {
            has_changes: false,
            branch: Some("main".to_string()),
        })
    }
}
