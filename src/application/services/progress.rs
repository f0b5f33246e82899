use std::fmt;

use crate::domain::entities::sync_outcome::RunMode;

/// エントリ処理中の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// 既存の出力ディレクトリを削除
    Reset,
    /// 出力先の準備
    Prepare,
    /// クローン
    Clone,
    /// クローン失敗時のpull
    PullFallback,
    /// 除外パスの削除
    Exclude,
    /// `.git` の削除
    Detach,
    /// ローカルHEADの取得
    ReadLocalHead,
    /// リモートHEADの取得
    ListRemote,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::Reset => "resetting",
            Step::Prepare => "preparing",
            Step::Clone => "cloning",
            Step::PullFallback => "pulling",
            Step::Exclude => "removing excluded paths",
            Step::Detach => "detaching",
            Step::ReadLocalHead => "reading local HEAD",
            Step::ListRemote => "listing remote heads",
        };
        f.write_str(label)
    }
}

/// バッチ内のエントリ
///
/// 進捗は `index` で対応付ける。表示は `name` のみ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLabel {
    pub index: usize,
    pub name: String,
}

impl EntryLabel {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

impl fmt::Display for EntryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 進捗イベント
///
/// `entry` はバッチ内でのエントリ番号。同じ表示名のエントリが
/// 複数あっても区別できる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// バッチ開始
    BatchStarted { mode: RunMode, total: usize },
    /// エントリの処理開始
    EntryStarted { entry: usize, name: String },
    /// エントリの段階遷移
    StepStarted { entry: usize, name: String, step: Step },
    /// エントリの処理終了
    EntryFinished {
        entry: usize,
        name: String,
        success: bool,
    },
    /// バッチ終了
    BatchFinished,
}

/// 進捗の通知先
///
/// 並列実行中に複数タスクから呼ばれるため `Send + Sync` を要求する。
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// 何も表示しないレポーター
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}
