use serde::{Deserialize, Serialize};
use std::fmt;

use super::shared_source::SourceSpec;
use crate::common::error::NeoxError;
use crate::infrastructure::scm::ScmError;

/// バッチの実行モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// ローカルとリモートのHEADを比較する（変更なし）
    Check,
    /// clone / pull で出力ディレクトリを更新する
    Pull,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Check => write!(f, "check"),
            RunMode::Pull => write!(f, "pull"),
        }
    }
}

/// 1エントリに対して実行された操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// 新規クローン
    Cloned,
    /// 既存リポジトリへのpull
    Pulled,
    /// 失敗
    Failed,
}

/// エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigMissing,
    InvalidConfig,
    FilesystemError,
    RemoteFetchError,
    RepositoryError,
    Timeout,
    Internal,
}

/// エントリ単位のエラー詳細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// エラーの分類
    pub kind: ErrorKind,

    /// 利用者向けのメッセージ
    pub message: String,

    /// 下位のエラー（`--debug` 時のみ保持）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ErrorDetail {
    /// NeoxErrorからエラー詳細を作成
    ///
    /// `include_cause` が偽の場合、下位の転送エラーは破棄する。
    pub fn from_error(error: &NeoxError, include_cause: bool) -> Self {
        let kind = match error {
            NeoxError::ConfigMissing { .. } => ErrorKind::ConfigMissing,
            NeoxError::ConfigExists { .. } | NeoxError::InvalidConfig { .. } => {
                ErrorKind::InvalidConfig
            }
            NeoxError::FileSystemError { .. } => ErrorKind::FilesystemError,
            NeoxError::RemoteFetchError {
                source: Some(ScmError::Timeout { .. }),
                ..
            }
            | NeoxError::RepositoryError {
                source: Some(ScmError::Timeout { .. }),
                ..
            } => ErrorKind::Timeout,
            NeoxError::RemoteFetchError { .. } => ErrorKind::RemoteFetchError,
            NeoxError::RepositoryError { .. } => ErrorKind::RepositoryError,
            NeoxError::SerializationError { .. } | NeoxError::InternalError { .. } => {
                ErrorKind::Internal
            }
        };

        Self {
            kind,
            message: error.to_string(),
            cause: if include_cause {
                error.cause_chain()
            } else {
                None
            },
        }
    }
}

/// 1エントリの同期結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// 実行された操作
    pub action: SyncAction,

    /// 対象の共有ソース
    pub source: SourceSpec,

    /// 失敗時のエラー
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl Outcome {
    /// 成功した結果を作成
    pub fn succeeded(action: SyncAction, source: SourceSpec) -> Self {
        Self {
            action,
            source,
            error: None,
        }
    }

    /// 失敗した結果を作成
    pub fn failed(source: SourceSpec, error: &NeoxError, include_cause: bool) -> Self {
        Self {
            action: SyncAction::Failed,
            source,
            error: Some(ErrorDetail::from_error(error, include_cause)),
        }
    }

    /// 失敗かどうか
    pub fn is_failure(&self) -> bool {
        self.action == SyncAction::Failed
    }
}

/// 1エントリのドリフト確認結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftStatus {
    /// ローカルHEADがリモートHEADと一致しているか
    pub is_up_to_date: bool,

    /// ローカルHEADのコミットハッシュ
    pub local_hash: Option<String>,

    /// リモートの先頭ブランチのコミットハッシュ
    pub remote_hash: Option<String>,

    /// 作業ツリーに未コミットの変更があるか（参考情報）
    #[serde(default)]
    pub has_local_changes: bool,

    /// 対象の共有ソース
    pub source: SourceSpec,

    /// 失敗時のエラー
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl DriftStatus {
    /// ハッシュの比較結果からステータスを作成
    pub fn compared(
        source: SourceSpec,
        local_hash: Option<String>,
        remote_hash: Option<String>,
    ) -> Self {
        let is_up_to_date = matches!((&local_hash, &remote_hash), (Some(l), Some(r)) if l == r);
        Self {
            is_up_to_date,
            local_hash,
            remote_hash,
            has_local_changes: false,
            source,
            error: None,
        }
    }

    /// エラー状態のステータスを作成
    pub fn errored(source: SourceSpec, error: &NeoxError, include_cause: bool) -> Self {
        Self {
            is_up_to_date: false,
            local_hash: None,
            remote_hash: None,
            has_local_changes: false,
            source,
            error: Some(ErrorDetail::from_error(error, include_cause)),
        }
    }

    /// 作業ツリーの変更有無を設定
    pub fn with_local_changes(mut self, has_local_changes: bool) -> Self {
        self.has_local_changes = has_local_changes;
        self
    }

    /// 対応が必要か（最新でない、またはエラー）
    pub fn needs_attention(&self) -> bool {
        !self.is_up_to_date || self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> SourceSpec {
        SourceSpec::new("https://example.com/a.git").with_out_dir("a")
    }

    #[test]
    fn test_drift_comparison_is_case_sensitive() {
        let same = DriftStatus::compared(spec(), Some("abc123".into()), Some("abc123".into()));
        assert!(same.is_up_to_date);
        assert!(!same.needs_attention());

        let case = DriftStatus::compared(spec(), Some("ABC123".into()), Some("abc123".into()));
        assert!(!case.is_up_to_date);

        let no_remote = DriftStatus::compared(spec(), Some("abc123".into()), None);
        assert!(!no_remote.is_up_to_date);
        assert!(no_remote.needs_attention());

        let nothing = DriftStatus::compared(spec(), None, None);
        assert!(!nothing.is_up_to_date);
    }

    #[test]
    fn test_error_detail_hides_cause_without_debug() {
        let error = NeoxError::remote_fetch_error_with_source(
            "clone and pull failed",
            None,
            ScmError::pull_failed("fatal: couldn't find remote ref main"),
        );

        let quiet = ErrorDetail::from_error(&error, false);
        assert_eq!(quiet.kind, ErrorKind::RemoteFetchError);
        assert!(quiet.cause.is_none());

        let verbose = ErrorDetail::from_error(&error, true);
        assert!(verbose.cause.unwrap().contains("couldn't find remote ref"));
    }

    #[test]
    fn test_timeout_kind() {
        let error = NeoxError::remote_fetch_error_with_source(
            "clone failed",
            None,
            ScmError::timeout("git clone", 300),
        );
        assert_eq!(ErrorDetail::from_error(&error, false).kind, ErrorKind::Timeout);
    }

    #[test]
    fn test_outcome_failure() {
        let outcome = Outcome::failed(spec(), &NeoxError::invalid_config("repo", "empty"), false);
        assert!(outcome.is_failure());
        assert_eq!(outcome.error.unwrap().kind, ErrorKind::InvalidConfig);

        let cloned = Outcome::succeeded(SyncAction::Cloned, spec());
        assert!(!cloned.is_failure());
        assert!(cloned.error.is_none());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = Outcome::succeeded(SyncAction::Pulled, spec());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["action"], "pulled");
        assert_eq!(json["source"]["outDir"], "a");
        assert!(json.get("error").is_none());
    }
}
