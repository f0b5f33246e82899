use std::fmt;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// 除外パス関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum ExcludePathError {
    #[error("Exclude path must not be empty")]
    Empty,

    #[error("Exclude path must be relative to the output directory: {0}")]
    Absolute(String),

    #[error("Exclude path must stay inside the output directory: {0}")]
    EscapesRoot(String),
}

/// 出力ディレクトリからの相対パスで表される除外対象
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExcludePath {
    path: PathBuf,
}

impl ExcludePath {
    /// 新しいExcludePathインスタンスを作成
    pub fn new(path: &str) -> Result<Self, ExcludePathError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(ExcludePathError::Empty);
        }

        let candidate = Path::new(trimmed);
        let mut normalized = PathBuf::new();
        for component in candidate.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(ExcludePathError::EscapesRoot(trimmed.to_string()))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(ExcludePathError::Absolute(trimmed.to_string()))
                }
            }
        }

        // "." や "./" は出力ディレクトリ自体を指す
        if normalized.as_os_str().is_empty() {
            return Err(ExcludePathError::EscapesRoot(trimmed.to_string()));
        }

        Ok(Self { path: normalized })
    }

    /// 設定値のリストをまとめて検証・変換する
    pub fn parse_all(paths: &[String]) -> Result<Vec<Self>, ExcludePathError> {
        paths.iter().map(|p| Self::new(p)).collect()
    }

    /// 正規化された相対パス
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// 出力ディレクトリを基準に絶対位置へ解決する
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }
}

impl fmt::Display for ExcludePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_are_normalized() {
        let path = ExcludePath::new("./docs/README.md").unwrap();
        assert_eq!(path.as_path(), Path::new("docs/README.md"));
        assert_eq!(
            path.resolve(Path::new("shared")),
            PathBuf::from("shared/docs/README.md")
        );
    }

    #[test]
    fn test_rejects_escaping_paths() {
        assert_eq!(ExcludePath::new(""), Err(ExcludePathError::Empty));
        assert!(matches!(
            ExcludePath::new("../secrets"),
            Err(ExcludePathError::EscapesRoot(_))
        ));
        assert!(matches!(
            ExcludePath::new("a/../../b"),
            Err(ExcludePathError::EscapesRoot(_))
        ));
        assert!(matches!(
            ExcludePath::new("."),
            Err(ExcludePathError::EscapesRoot(_))
        ));
        assert!(matches!(
            ExcludePath::new("/etc/passwd"),
            Err(ExcludePathError::Absolute(_))
        ));
    }

    #[test]
    fn test_parse_all_stops_at_first_invalid() {
        let paths = vec!["README.md".to_string(), "../x".to_string()];
        assert!(ExcludePath::parse_all(&paths).is_err());

        let paths = vec!["README.md".to_string(), ".github".to_string()];
        assert_eq!(ExcludePath::parse_all(&paths).unwrap().len(), 2);
    }
}
