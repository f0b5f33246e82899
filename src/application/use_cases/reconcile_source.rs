use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::application::services::progress::{
    EntryLabel, ProgressEvent, ProgressReporter, Step,
};
use crate::common::error::NeoxError;
use crate::common::result::{NeoxResult, ResultExt};
use crate::domain::entities::shared_source::{SourceSpec, DEFAULT_BRANCH};
use crate::domain::entities::sync_outcome::{Outcome, SyncAction};
use crate::domain::value_objects::git_url::GitUrl;
use crate::infrastructure::filesystem::workdir;
use crate::infrastructure::scm::VersionControlClient;

/// 共有ソース1件を出力ディレクトリへ反映するユースケース
///
/// サブモジュールの場合は既存ディレクトリを再利用し、クローンに失敗したら
/// `main` ブランチのpullにフォールバックする。サブモジュールでない場合は
/// 一時ディレクトリにクローンして除外・`.git` 削除を行った後、出力ディレクトリと
/// 置き換える。
pub struct ReconcileSourceUseCase {
    /// バージョン管理クライアント
    scm: Arc<dyn VersionControlClient>,

    /// 進捗の通知先
    progress: Arc<dyn ProgressReporter>,

    /// `outDir` の基準ディレクトリ
    root_dir: PathBuf,
}

impl ReconcileSourceUseCase {
    /// 新しいReconcileSourceUseCaseインスタンスを作成
    pub fn new(scm: Arc<dyn VersionControlClient>, progress: Arc<dyn ProgressReporter>) -> Self {
        Self {
            scm,
            progress,
            root_dir: PathBuf::from("."),
        }
    }

    /// 基準ディレクトリを設定
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// 1エントリを同期する
    ///
    /// エラーは返さず、`Outcome` に格納する。`debug` が偽の場合は
    /// 下位のエラー内容を破棄する。
    pub async fn execute(&self, spec: &SourceSpec, debug: bool) -> Outcome {
        self.execute_entry(0, spec, debug).await
    }

    /// バッチ内の `index` 番目のエントリとして同期する
    pub async fn execute_entry(&self, index: usize, spec: &SourceSpec, debug: bool) -> Outcome {
        let entry = EntryLabel::new(index, spec.display_name());
        self.progress.report(ProgressEvent::EntryStarted {
            entry: index,
            name: entry.name.clone(),
        });

        let outcome = match self.reconcile(spec, &entry).await {
            Ok(action) => {
                info!("{}: {:?}", entry, action);
                Outcome::succeeded(action, spec.clone())
            }
            Err(e) => {
                error!("{}: {}", entry, e);
                Outcome::failed(spec.clone(), &e, debug)
            }
        };

        self.progress.report(ProgressEvent::EntryFinished {
            entry: index,
            name: entry.name,
            success: !outcome.is_failure(),
        });
        outcome
    }

    fn step(&self, entry: &EntryLabel, step: Step) {
        debug!("{}: {}", entry, step);
        self.progress.report(ProgressEvent::StepStarted {
            entry: entry.index,
            name: entry.name.clone(),
            step,
        });
    }

    async fn reconcile(&self, spec: &SourceSpec, entry: &EntryLabel) -> NeoxResult<SyncAction> {
        // URLが空の場合はネットワーク・ファイルシステムに触れずに失敗する
        let url = spec.validate_entry()?;
        let out_path = spec.out_path(&self.root_dir);
        if url.has_credentials() {
            debug!("{}: using credentials embedded in {}", entry, url.redacted());
        }

        if spec.submodule() {
            self.reconcile_submodule(spec, entry, &url, &out_path).await
        } else {
            self.reconcile_detached(spec, entry, &url, &out_path).await
        }
    }

    /// サブモジュール: 既存のディレクトリを残したままclone、失敗したらpull
    async fn reconcile_submodule(
        &self,
        spec: &SourceSpec,
        entry: &EntryLabel,
        url: &GitUrl,
        out_path: &Path,
    ) -> NeoxResult<SyncAction> {
        self.step(entry, Step::Prepare);
        create_dir(out_path).await?;

        self.step(entry, Step::Clone);
        let action = match self.scm.clone_repository(url.as_str(), out_path).await {
            Ok(()) => SyncAction::Cloned,
            Err(clone_error) => {
                warn!(
                    "{}: clone failed, pulling {} instead: {}",
                    entry, DEFAULT_BRANCH, clone_error
                );
                self.step(entry, Step::PullFallback);
                self.scm
                    .pull(out_path, url.as_str(), DEFAULT_BRANCH)
                    .await
                    .map_err(|pull_error| {
                        NeoxError::remote_fetch_error_with_source(
                            format!("could not clone or pull {}", url.redacted()),
                            Some(url.redacted()),
                            pull_error,
                        )
                    })?;
                SyncAction::Pulled
            }
        };

        self.step(entry, Step::Exclude);
        let excludes = spec.resolved_exclude_paths()?;
        workdir::remove_excluded(out_path, &excludes).await?;

        Ok(action)
    }

    /// 非サブモジュール: 一時ディレクトリで取得・正規化してから置き換える
    ///
    /// 失敗した場合、既存の出力ディレクトリはそのまま残る。
    async fn reconcile_detached(
        &self,
        spec: &SourceSpec,
        entry: &EntryLabel,
        url: &GitUrl,
        out_path: &Path,
    ) -> NeoxResult<SyncAction> {
        let staging = workdir::staging_path_for(out_path);

        self.step(entry, Step::Prepare);
        workdir::remove_path_if_exists(&staging).await?;
        create_dir(&staging).await?;

        let result = self.fetch_into_staging(spec, entry, url, &staging).await;
        let result = match result {
            Ok(()) => {
                self.step(entry, Step::Reset);
                workdir::replace_dir(&staging, out_path).await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            if let Err(cleanup_error) = workdir::remove_path_if_exists(&staging).await {
                warn!(
                    "{}: failed to clean up {}: {}",
                    entry,
                    staging.display(),
                    cleanup_error
                );
            }
            return Err(e);
        }

        Ok(SyncAction::Cloned)
    }

    async fn fetch_into_staging(
        &self,
        spec: &SourceSpec,
        entry: &EntryLabel,
        url: &GitUrl,
        staging: &Path,
    ) -> NeoxResult<()> {
        self.step(entry, Step::Clone);
        self.scm
            .clone_repository(url.as_str(), staging)
            .await
            .map_err(|e| {
                NeoxError::remote_fetch_error_with_source(
                    format!("could not clone {}", url.redacted()),
                    Some(url.redacted()),
                    e,
                )
            })?;

        self.step(entry, Step::Exclude);
        let excludes = spec.resolved_exclude_paths()?;
        workdir::remove_excluded(staging, &excludes).await?;

        self.step(entry, Step::Detach);
        workdir::strip_vcs_metadata(staging).await?;

        Ok(())
    }
}

async fn create_dir(path: &Path) -> NeoxResult<()> {
    tokio::fs::create_dir_all(path).await.with_filesystem_error(
        format!("Failed to create output directory: {}", path.display()),
        Some(path.to_path_buf()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::progress::testing::RecordingProgress;
    use crate::application::services::progress::NoopProgress;
    use crate::domain::entities::sync_outcome::ErrorKind;
    use crate::infrastructure::scm::{MockVersionControlClient, ScmError};
    use mockall::predicate::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const URL: &str = "https://example.com/a.git";

    fn use_case(scm: MockVersionControlClient, root: &Path) -> ReconcileSourceUseCase {
        ReconcileSourceUseCase::new(Arc::new(scm), Arc::new(NoopProgress)).with_root_dir(root)
    }

    fn materialize(dest: &Path) {
        fs::create_dir_all(dest.join(".git")).unwrap();
        fs::write(dest.join("README.md"), "readme").unwrap();
        fs::write(dest.join("lib.rs"), "pub fn shared() {}").unwrap();
    }

    #[tokio::test]
    async fn test_empty_repo_fails_without_side_effects() {
        let temp = TempDir::new().unwrap();
        // 期待値を設定しないため、呼び出されるとパニックする
        let scm = MockVersionControlClient::new();
        let spec = SourceSpec::new("").with_out_dir("a").with_exclude(Vec::<String>::new());

        let outcome = use_case(scm, temp.path()).execute(&spec, false).await;

        assert_eq!(outcome.action, SyncAction::Failed);
        assert_eq!(outcome.error.unwrap().kind, ErrorKind::InvalidConfig);
        assert!(!temp.path().join("a").exists());
    }

    #[tokio::test]
    async fn test_submodule_first_run_clones() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("a");

        let mut scm = MockVersionControlClient::new();
        scm.expect_clone_repository()
            .with(eq(URL), eq(out.clone()))
            .times(1)
            .returning(|_, dest| {
                materialize(dest);
                Ok(())
            });
        scm.expect_pull().never();

        let spec = SourceSpec::new(URL)
            .with_out_dir("a")
            .with_submodule(true)
            .with_exclude(Vec::<String>::new());
        let outcome = use_case(scm, temp.path()).execute(&spec, false).await;

        assert_eq!(outcome.action, SyncAction::Cloned);
        assert!(outcome.error.is_none());
        assert!(out.join(".git").exists());
        assert!(out.join("README.md").exists());
    }

    #[tokio::test]
    async fn test_submodule_falls_back_to_pull_on_main() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("a");
        materialize(&out);

        let mut scm = MockVersionControlClient::new();
        scm.expect_clone_repository().times(1).returning(|_, _| {
            Err(ScmError::clone_failed(
                "destination path 'a' already exists and is not an empty directory",
            ))
        });
        scm.expect_pull()
            .with(eq(out.clone()), eq(URL), eq("main"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let spec = SourceSpec::new(URL)
            .with_out_dir("a")
            .with_exclude(["README.md"]);
        let outcome = use_case(scm, temp.path()).execute(&spec, false).await;

        assert_eq!(outcome.action, SyncAction::Pulled);
        assert!(!out.join("README.md").exists());
        assert!(out.join(".git").exists());
    }

    #[tokio::test]
    async fn test_submodule_clone_and_pull_failure() {
        let temp = TempDir::new().unwrap();

        let mut scm = MockVersionControlClient::new();
        scm.expect_clone_repository()
            .times(1)
            .returning(|_, _| Err(ScmError::clone_failed("network unreachable")));
        scm.expect_pull()
            .times(1)
            .returning(|_, _, _| Err(ScmError::pull_failed("couldn't find remote ref main")));

        let spec = SourceSpec::new(URL)
            .with_out_dir("a")
            .with_exclude(Vec::<String>::new());

        let quiet = use_case(scm, temp.path()).execute(&spec, false).await;
        assert_eq!(quiet.action, SyncAction::Failed);
        let detail = quiet.error.unwrap();
        assert_eq!(detail.kind, ErrorKind::RemoteFetchError);
        assert!(detail.cause.is_none());
    }

    #[tokio::test]
    async fn test_debug_keeps_last_error() {
        let temp = TempDir::new().unwrap();

        let mut scm = MockVersionControlClient::new();
        scm.expect_clone_repository()
            .returning(|_, _| Err(ScmError::clone_failed("network unreachable")));
        scm.expect_pull()
            .returning(|_, _, _| Err(ScmError::pull_failed("couldn't find remote ref main")));

        let spec = SourceSpec::new(URL)
            .with_out_dir("a")
            .with_exclude(Vec::<String>::new());
        let outcome = use_case(scm, temp.path()).execute(&spec, true).await;

        let cause = outcome.error.unwrap().cause.unwrap();
        assert!(cause.contains("couldn't find remote ref main"));
    }

    #[tokio::test]
    async fn test_missing_exclude_is_invalid_config_after_fetch() {
        let temp = TempDir::new().unwrap();

        let mut scm = MockVersionControlClient::new();
        scm.expect_clone_repository().times(1).returning(|_, dest| {
            materialize(dest);
            Ok(())
        });

        let spec = SourceSpec::new(URL).with_out_dir("a");
        let outcome = use_case(scm, temp.path()).execute(&spec, false).await;

        assert_eq!(outcome.action, SyncAction::Failed);
        assert_eq!(outcome.error.unwrap().kind, ErrorKind::InvalidConfig);
    }

    #[tokio::test]
    async fn test_detached_source_is_normalized() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("a");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.txt"), "left over").unwrap();

        let mut scm = MockVersionControlClient::new();
        scm.expect_clone_repository().times(1).returning(|_, dest| {
            materialize(dest);
            Ok(())
        });
        scm.expect_pull().never();

        let spec = SourceSpec::new(URL)
            .with_out_dir("a")
            .with_submodule(false)
            .with_exclude(["README.md", "not-there"]);
        let outcome = use_case(scm, temp.path()).execute(&spec, false).await;

        assert_eq!(outcome.action, SyncAction::Cloned);
        assert!(out.join("lib.rs").exists());
        assert!(!out.join("README.md").exists());
        assert!(!out.join(".git").exists());
        assert!(!out.join("stale.txt").exists());
        assert!(!workdir::staging_path_for(&out).exists());
    }

    #[tokio::test]
    async fn test_detached_clone_failure_keeps_previous_contents() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("a");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("lib.rs"), "previous").unwrap();

        let mut scm = MockVersionControlClient::new();
        scm.expect_clone_repository()
            .times(1)
            .returning(|_, _| Err(ScmError::clone_failed("authentication failed")));
        scm.expect_pull().never();

        let spec = SourceSpec::new(URL)
            .with_out_dir("a")
            .with_submodule(false)
            .with_exclude(Vec::<String>::new());
        let outcome = use_case(scm, temp.path()).execute(&spec, false).await;

        assert_eq!(outcome.action, SyncAction::Failed);
        assert_eq!(outcome.error.unwrap().kind, ErrorKind::RemoteFetchError);
        assert_eq!(fs::read_to_string(out.join("lib.rs")).unwrap(), "previous");
        assert!(!workdir::staging_path_for(&out).exists());
    }

    #[tokio::test]
    async fn test_progress_steps_in_order() {
        let temp = TempDir::new().unwrap();
        let progress = Arc::new(RecordingProgress::default());

        let mut scm = MockVersionControlClient::new();
        scm.expect_clone_repository().returning(|_, dest| {
            materialize(dest);
            Ok(())
        });

        let use_case = ReconcileSourceUseCase::new(Arc::new(scm), progress.clone())
            .with_root_dir(temp.path());
        let spec = SourceSpec::new(URL)
            .with_out_dir("a")
            .with_submodule(false)
            .with_exclude(Vec::<String>::new());
        use_case.execute(&spec, false).await;

        assert_eq!(
            progress.steps_for("a"),
            vec![Step::Prepare, Step::Clone, Step::Exclude, Step::Detach, Step::Reset]
        );
        assert!(progress.events().contains(&ProgressEvent::EntryFinished {
            entry: 0,
            name: "a".into(),
            success: true
        }));
    }
}
