use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use validator::{Validate, ValidationError};

use crate::common::error::NeoxError;
use crate::common::result::NeoxResult;
use crate::domain::value_objects::exclude_path::ExcludePath;
use crate::domain::value_objects::git_url::{redact_url, GitUrl};

/// `outDir` 未指定時の出力ディレクトリ
pub const DEFAULT_OUT_DIR: &str = ".neoX";

/// pullフォールバックで使用するブランチ
pub const DEFAULT_BRANCH: &str = "main";

/// 共有ソース（設定ファイル `shared` の1エントリ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SourceSpec {
    /// リポジトリのURL（トークンを含む場合がある）
    #[serde(rename = "repo", default, serialize_with = "serialize_redacted")]
    #[validate(length(min = 1, message = "repository URL must not be empty"))]
    pub repository_url: String,

    /// 出力ディレクトリ（未指定時は `.neoX`）
    #[serde(rename = "outDir", default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_out_dir"))]
    pub output_directory: Option<String>,

    /// サブモジュールとして扱うか（未指定時は `true`）
    #[serde(rename = "isSubmodule", default, skip_serializing_if = "Option::is_none")]
    pub is_submodule: Option<bool>,

    /// 取得後に削除する相対パス（キー自体は必須、空配列は可）
    #[serde(rename = "exclude", default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_exclude_paths"))]
    pub exclude_paths: Option<Vec<String>>,
}

#[allow(clippy::ptr_arg)]
fn serialize_redacted<S>(url: &String, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&redact_url(url))
}

fn validation_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

fn validate_out_dir(out_dir: &str) -> Result<(), ValidationError> {
    let trimmed = out_dir.trim();
    if trimmed.is_empty() {
        return Err(validation_error(
            "out_dir",
            "output directory must not be empty".to_string(),
        ));
    }

    let mut named = false;
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(_) => named = true,
            Component::CurDir => {}
            _ => {
                return Err(validation_error(
                    "out_dir",
                    format!(
                        "output directory must be a relative path below the working directory: {}",
                        trimmed
                    ),
                ))
            }
        }
    }

    if !named {
        return Err(validation_error(
            "out_dir",
            format!("output directory must name a directory: {}", trimmed),
        ));
    }

    Ok(())
}

#[allow(clippy::ptr_arg)]
fn validate_exclude_paths(paths: &Vec<String>) -> Result<(), ValidationError> {
    ExcludePath::parse_all(paths)
        .map(|_| ())
        .map_err(|e| validation_error("exclude_path", e.to_string()))
}

/// バリデーションエラーのフィールド名を設定ファイルのキーに変換
fn config_key(field: &str) -> &str {
    match field {
        "repository_url" | "repo" => "repo",
        "output_directory" | "outDir" => "outDir",
        "exclude_paths" | "exclude" => "exclude",
        "is_submodule" | "isSubmodule" => "isSubmodule",
        other => other,
    }
}

impl SourceSpec {
    /// 新しいSourceSpecインスタンスを作成
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            output_directory: None,
            is_submodule: None,
            exclude_paths: None,
        }
    }

    /// 出力ディレクトリを設定
    pub fn with_out_dir(mut self, out_dir: impl Into<String>) -> Self {
        self.output_directory = Some(out_dir.into());
        self
    }

    /// サブモジュールフラグを設定
    pub fn with_submodule(mut self, is_submodule: bool) -> Self {
        self.is_submodule = Some(is_submodule);
        self
    }

    /// 除外パスを設定
    pub fn with_exclude<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    /// 解決済みの出力ディレクトリ
    pub fn out_dir(&self) -> &str {
        self.output_directory
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_OUT_DIR)
    }

    /// ルートディレクトリを基準にした出力ディレクトリのパス
    pub fn out_path(&self, root: &Path) -> PathBuf {
        root.join(self.out_dir())
    }

    /// 解決済みのサブモジュールフラグ
    pub fn submodule(&self) -> bool {
        self.is_submodule.unwrap_or(true)
    }

    /// レポート用の表示名（`outDir`、なければ伏字化したURL）
    pub fn display_name(&self) -> String {
        match self.output_directory.as_deref() {
            Some(out_dir) if !out_dir.trim().is_empty() => out_dir.trim().to_string(),
            _ => redact_url(&self.repository_url),
        }
    }

    /// 取得前に必要なエントリ単位の検証
    ///
    /// 失敗した場合は `InvalidConfig` を返し、エントリの処理は行わない。
    pub fn validate_entry(&self) -> NeoxResult<GitUrl> {
        if let Err(errors) = self.validate() {
            let mut messages: Vec<(String, String)> = errors
                .field_errors()
                .into_iter()
                .map(|(field, field_errors)| {
                    let message = field_errors
                        .first()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .unwrap_or_default();
                    (config_key(&field.to_string()).to_string(), message)
                })
                .collect();
            messages.sort();

            if let Some((field, message)) = messages.into_iter().next() {
                return Err(NeoxError::invalid_config(field, message));
            }
        }

        GitUrl::new(&self.repository_url).map_err(|e| NeoxError::invalid_config("repo", e.to_string()))
    }

    /// 除外パスを取得・検証する（キーが存在しない場合は設定エラー）
    pub fn resolved_exclude_paths(&self) -> NeoxResult<Vec<ExcludePath>> {
        let paths = self.exclude_paths.as_ref().ok_or_else(|| {
            NeoxError::invalid_config(
                "exclude",
                format!(
                    "make sure you defined \"exclude\" for {} (use [] when nothing is excluded)",
                    self.display_name()
                ),
            )
        })?;

        ExcludePath::parse_all(paths).map_err(|e| NeoxError::invalid_config("exclude", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_from_minimal_json() {
        let spec: SourceSpec =
            serde_json::from_str(r#"{ "repo": "https://example.com/a.git" }"#).unwrap();

        assert_eq!(spec.out_dir(), DEFAULT_OUT_DIR);
        assert!(spec.submodule());
        assert!(spec.exclude_paths.is_none());
        assert!(spec.output_directory.is_none());
    }

    #[test]
    fn test_full_entry_from_json() {
        let spec: SourceSpec = serde_json::from_str(
            r#"{
                "repo": "https://example.com/a.git",
                "outDir": "a",
                "isSubmodule": false,
                "exclude": ["README.md"],
                "comment": "unknown keys are ignored"
            }"#,
        )
        .unwrap();

        assert_eq!(
            spec,
            SourceSpec::new("https://example.com/a.git")
                .with_out_dir("a")
                .with_submodule(false)
                .with_exclude(["README.md"])
        );
    }

    #[test]
    fn test_validate_entry_rejects_empty_repo() {
        let spec = SourceSpec::new("").with_exclude(Vec::<String>::new());
        match spec.validate_entry() {
            Err(NeoxError::InvalidConfig { field, .. }) => assert_eq!(field, "repo"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_entry_rejects_escaping_paths() {
        let spec = SourceSpec::new("https://example.com/a.git")
            .with_out_dir("a")
            .with_exclude(["../../etc"]);
        match spec.validate_entry() {
            Err(NeoxError::InvalidConfig { field, .. }) => assert_eq!(field, "exclude"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }

        let spec = SourceSpec::new("https://example.com/a.git").with_out_dir("/tmp/a");
        match spec.validate_entry() {
            Err(NeoxError::InvalidConfig { field, .. }) => assert_eq!(field, "outDir"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }

        let spec = SourceSpec::new("https://example.com/a.git").with_out_dir(".");
        assert!(spec.validate_entry().is_err());
    }

    #[test]
    fn test_validate_entry_accepts_valid_spec() {
        let spec = SourceSpec::new("https://example.com/a.git")
            .with_out_dir("libs/a")
            .with_exclude(["README.md", "docs"]);
        let url = spec.validate_entry().unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.git");
    }

    #[test]
    fn test_missing_exclude_differs_from_empty() {
        let missing = SourceSpec::new("https://example.com/a.git");
        assert!(matches!(
            missing.resolved_exclude_paths(),
            Err(NeoxError::InvalidConfig { .. })
        ));

        let empty = SourceSpec::new("https://example.com/a.git").with_exclude(Vec::<String>::new());
        assert!(empty.resolved_exclude_paths().unwrap().is_empty());
    }

    #[test]
    fn test_display_name_and_serialization_hide_token() {
        let spec = SourceSpec::new("https://token123@example.com/a.git");
        assert_eq!(spec.display_name(), "https://***@example.com/a.git");

        let json = serde_json::to_string(&spec).unwrap();
        assert!(!json.contains("token123"));

        let named = spec.with_out_dir("a");
        assert_eq!(named.display_name(), "a");
    }
}
