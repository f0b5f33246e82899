use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::services::progress::{
    EntryLabel, ProgressEvent, ProgressReporter, Step,
};
use crate::common::error::NeoxError;
use crate::common::result::{NeoxResult, OptionExt};
use crate::domain::entities::shared_source::SourceSpec;
use crate::domain::entities::sync_outcome::DriftStatus;
use crate::infrastructure::scm::{parse_remote_head, VersionControlClient};

/// ローカルHEADとリモートHEADを比較するユースケース
///
/// 出力ディレクトリの内容は一切変更しない。
pub struct DriftCheckUseCase {
    /// バージョン管理クライアント
    scm: Arc<dyn VersionControlClient>,

    /// 進捗の通知先
    progress: Arc<dyn ProgressReporter>,

    /// `outDir` の基準ディレクトリ
    root_dir: PathBuf,
}

impl DriftCheckUseCase {
    /// 新しいDriftCheckUseCaseインスタンスを作成
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

    /// 1エントリのドリフトを確認する
    pub async fn execute(&self, spec: &SourceSpec, debug: bool) -> DriftStatus {
        self.execute_entry(0, spec, debug).await
    }

    /// バッチ内の `index` 番目のエントリとして確認する
    pub async fn execute_entry(&self, index: usize, spec: &SourceSpec, debug: bool) -> DriftStatus {
        let entry = EntryLabel::new(index, spec.display_name());
        self.progress.report(ProgressEvent::EntryStarted {
            entry: index,
            name: entry.name.clone(),
        });

        let status = match self.check(spec, &entry).await {
            Ok(status) => {
                if status.is_up_to_date {
                    info!("{}: up to date", entry);
                } else {
                    warn!(
                        "{}: local {} differs from remote {}",
                        entry,
                        status.local_hash.as_deref().unwrap_or("-"),
                        status.remote_hash.as_deref().unwrap_or("-")
                    );
                }
                status
            }
            Err(e) => {
                warn!("{}: {}", entry, e);
                DriftStatus::errored(spec.clone(), &e, debug)
            }
        };

        self.progress.report(ProgressEvent::EntryFinished {
            entry: index,
            name: entry.name,
            success: !status.needs_attention(),
        });
        status
    }

    fn step(&self, entry: &EntryLabel, step: Step) {
        debug!("{}: {}", entry, step);
        self.progress.report(ProgressEvent::StepStarted {
            entry: entry.index,
            name: entry.name.clone(),
            step,
        });
    }

    async fn check(&self, spec: &SourceSpec, entry: &EntryLabel) -> NeoxResult<DriftStatus> {
        let is_submodule = spec.is_submodule.ok_or_invalid_config(
            "isSubmodule",
            format!("make sure you defined \"isSubmodule\" for {}", entry),
        )?;
        spec.output_directory.as_ref().ok_or_invalid_config(
            "outDir",
            format!("make sure you defined \"outDir\" for {}", entry),
        )?;
        if !is_submodule {
            return Err(NeoxError::invalid_config(
                "isSubmodule",
                format!(
                    "{} is not a submodule; its git metadata is removed after pull, so there is no local HEAD to compare",
                    entry
                ),
            ));
        }
        spec.validate_entry()?;

        let out_path = spec.out_path(&self.root_dir);

        self.step(entry, Step::ReadLocalHead);
        let local_hash = self.local_head(&out_path, spec).await?;

        self.step(entry, Step::ListRemote);
        let listing = self.scm.list_remote_heads(&out_path).await.map_err(|e| {
            NeoxError::remote_fetch_error_with_source(
                format!("could not list remote heads for {}", entry),
                None,
                e,
            )
        })?;
        let remote_hash = parse_remote_head(&listing);
        if remote_hash.is_none() {
            debug!("{}: no heads in remote listing", entry);
        }

        let has_local_changes = match self.scm.status(&out_path).await {
            Ok(status) => status.has_changes,
            Err(e) => {
                debug!("{}: status unavailable: {}", entry, e);
                false
            }
        };

        Ok(DriftStatus::compared(spec.clone(), local_hash, remote_hash)
            .with_local_changes(has_local_changes))
    }

    async fn local_head(&self, out_path: &Path, spec: &SourceSpec) -> NeoxResult<Option<String>> {
        let commits = self.scm.log(out_path, 1).await.map_err(|e| {
            NeoxError::repository_error_with_source(
                format!("could not read local HEAD in {}", out_path.display()),
                Some(spec.out_dir().to_string()),
                e,
            )
        })?;
        Ok(commits.into_iter().next().map(|commit| commit.hash))
    }
}
