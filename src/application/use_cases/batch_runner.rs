use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::drift_check::DriftCheckUseCase;
use super::reconcile_source::ReconcileSourceUseCase;
use crate::application::services::progress::{ProgressEvent, ProgressReporter};
use crate::domain::entities::shared_source::SourceSpec;
use crate::domain::entities::sync_outcome::{DriftStatus, Outcome, RunMode, SyncAction};
use crate::infrastructure::scm::VersionControlClient;

/// 処理対象の選択
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// 全エントリ
    All,
    /// `outDir` が一致する最初のエントリ（一致しなければ対象なし）
    Target(String),
    /// 設定内の位置で指定された1エントリ（対話的な選択の結果）
    Entry(usize),
}

impl Selection {
    /// CLIフラグから選択を作成（`--target` が `--all` より優先）
    ///
    /// どちらも指定されていない場合は `None` を返し、呼び出し側で解決する。
    pub fn from_flags(all: bool, target: Option<String>) -> Option<Self> {
        match (all, target) {
            (_, Some(target)) => Some(Self::Target(target)),
            (true, None) => Some(Self::All),
            (false, None) => None,
        }
    }

    /// 選択に該当するエントリを設定順で返す
    pub fn apply<'a>(&self, specs: &'a [SourceSpec]) -> Vec<&'a SourceSpec> {
        match self {
            Self::All => specs.iter().collect(),
            Self::Target(target) => specs
                .iter()
                .find(|spec| spec.out_dir() == target.as_str())
                .into_iter()
                .collect(),
            Self::Entry(index) => specs.get(*index).into_iter().collect(),
        }
    }
}

/// バッチ実行の結果
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// 実行モード
    pub mode: RunMode,

    /// Pullモードの結果（設定順）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<Outcome>,

    /// Checkモードの結果（対応が必要なものが先）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub drift: Vec<DriftStatus>,
}

impl BatchResult {
    /// 処理対象のない結果
    pub fn empty(mode: RunMode) -> Self {
        Self {
            mode,
            outcomes: Vec::new(),
            drift: Vec::new(),
        }
    }

    /// 処理したエントリ数
    pub fn processed_count(&self) -> usize {
        match self.mode {
            RunMode::Check => self.drift.len(),
            RunMode::Pull => self.outcomes.len(),
        }
    }

    fn count_action(&self, action: SyncAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }

    pub fn cloned_count(&self) -> usize {
        self.count_action(SyncAction::Cloned)
    }

    pub fn pulled_count(&self) -> usize {
        self.count_action(SyncAction::Pulled)
    }

    pub fn failed_count(&self) -> usize {
        self.count_action(SyncAction::Failed)
    }

    pub fn up_to_date_count(&self) -> usize {
        self.drift.iter().filter(|s| !s.needs_attention()).count()
    }

    pub fn attention_count(&self) -> usize {
        self.drift.iter().filter(|s| s.needs_attention()).count()
    }

    /// Pullで1件以上失敗したか
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Checkで1件以上対応が必要か
    pub fn needs_attention(&self) -> bool {
        self.attention_count() > 0
    }

    /// プロセスの終了コード
    pub fn exit_code(&self) -> u8 {
        let failed = match self.mode {
            RunMode::Check => self.needs_attention(),
            RunMode::Pull => self.has_failures(),
        };
        u8::from(failed)
    }
}

/// 対応が必要なものを先頭に並べ替える（各グループ内の順序は維持）
fn attention_first(statuses: Vec<DriftStatus>) -> Vec<DriftStatus> {
    let (mut attention, up_to_date): (Vec<_>, Vec<_>) =
        statuses.into_iter().partition(DriftStatus::needs_attention);
    attention.extend(up_to_date);
    attention
}

/// 選択されたエントリに対してReconciler / DriftCheckerを実行する
///
/// エントリごとの失敗は結果に記録され、残りのエントリの処理は続行する。
/// 並列数が1より大きい場合もエントリ間で出力ディレクトリは独立しており、
/// 結果は設定順で返る。
pub struct BatchRunner {
    reconciler: ReconcileSourceUseCase,
    drift_checker: DriftCheckUseCase,
    progress: Arc<dyn ProgressReporter>,
    jobs: usize,
    debug: bool,
}

impl BatchRunner {
    /// 新しいBatchRunnerインスタンスを作成
    pub fn new(scm: Arc<dyn VersionControlClient>, progress: Arc<dyn ProgressReporter>) -> Self {
        Self {
            reconciler: ReconcileSourceUseCase::new(scm.clone(), progress.clone()),
            drift_checker: DriftCheckUseCase::new(scm, progress.clone()),
            progress,
            jobs: 1,
            debug: false,
        }
    }

    /// `outDir` の基準ディレクトリを設定
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        self.reconciler = self.reconciler.with_root_dir(root_dir.clone());
        self.drift_checker = self.drift_checker.with_root_dir(root_dir);
        self
    }

    /// 同時に処理するエントリ数を設定（最小1）
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// エラーの詳細を結果に含めるか
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 選択されたエントリを処理する
    pub async fn run_all(
        &self,
        specs: &[SourceSpec],
        mode: RunMode,
        selection: &Selection,
    ) -> BatchResult {
        let selected = selection.apply(specs);
        if selected.is_empty() {
            info!("No shared source matches {:?}", selection);
        }
        warn_duplicate_out_dirs(&selected);

        self.progress.report(ProgressEvent::BatchStarted {
            mode,
            total: selected.len(),
        });

        let mut result = BatchResult::empty(mode);
        match mode {
            RunMode::Pull => {
                result.outcomes = stream::iter(selected.into_iter().enumerate())
                    .map(|(index, spec)| self.reconciler.execute_entry(index, spec, self.debug))
                    .buffered(self.jobs)
                    .collect()
                    .await;
            }
            RunMode::Check => {
                let statuses: Vec<DriftStatus> = stream::iter(selected.into_iter().enumerate())
                    .map(|(index, spec)| {
                        self.drift_checker.execute_entry(index, spec, self.debug)
                    })
                    .buffered(self.jobs)
                    .collect()
                    .await;
                result.drift = attention_first(statuses);
            }
        }

        self.progress.report(ProgressEvent::BatchFinished);
        info!(
            "{} finished: {} processed, exit code {}",
            mode,
            result.processed_count(),
            result.exit_code()
        );
        result
    }
}

fn warn_duplicate_out_dirs(selected: &[&SourceSpec]) {
    let mut seen = HashSet::new();
    for spec in selected {
        if !seen.insert(spec.out_dir()) {
            warn!(
                "Output directory {} is used by more than one shared source; results may overwrite each other",
                spec.out_dir()
            );
        }
    }
}
