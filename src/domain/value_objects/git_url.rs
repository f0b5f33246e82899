use std::fmt;
use thiserror::Error;
use url::Url;

/// GitURL関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum GitUrlError {
    #[error("Repository URL must not be empty")]
    Empty,

    #[error("Repository URL must not start with '-': {0}")]
    OptionLike(String),

    #[error("Invalid characters in URL: {0}")]
    InvalidCharacters(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// 共有ソースのリポジトリURLの値オブジェクト
///
/// アクセストークンを含む可能性があるため、git にはそのまま渡し、
/// ログやレポートには [`GitUrl::redacted`] を使用する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitUrl {
    /// 設定ファイルに記述されたURL（前後の空白のみ除去）
    url: String,
}

impl GitUrl {
    /// 新しいGitUrlインスタンスを作成
    pub fn new(url: &str) -> Result<Self, GitUrlError> {
        let trimmed = url.trim();

        if trimmed.is_empty() {
            return Err(GitUrlError::Empty);
        }

        // git の引数として解釈されるのを防ぐ
        if trimmed.starts_with('-') {
            return Err(GitUrlError::OptionLike(trimmed.to_string()));
        }

        for ch in trimmed.chars() {
            if ch.is_control() {
                return Err(GitUrlError::InvalidCharacters(format!(
                    "Control character detected: {:?}",
                    ch
                )));
            }
        }

        if let Ok(parsed) = Url::parse(trimmed) {
            if !matches!(parsed.scheme(), "https" | "http" | "git" | "ssh" | "file") {
                return Err(GitUrlError::UnsupportedScheme(parsed.scheme().to_string()));
            }
        }

        Ok(Self {
            url: trimmed.to_string(),
        })
    }

    /// 元のURL文字列を取得（認証情報を含む）
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// URLに認証情報（トークン等）が埋め込まれているか
    pub fn has_credentials(&self) -> bool {
        match Url::parse(&self.url) {
            Ok(parsed) => {
                matches!(parsed.scheme(), "https" | "http")
                    && (!parsed.username().is_empty() || parsed.password().is_some())
            }
            Err(_) => false,
        }
    }

    /// 認証情報を伏せたURLを取得
    pub fn redacted(&self) -> String {
        redact_url(&self.url)
    }
}

/// 任意のURL文字列から認証情報を伏せる
///
/// `https://<token>@github.com/owner/repo.git` → `https://***@github.com/owner/repo.git`
pub fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    if !matches!(parsed.scheme(), "https" | "http") {
        return url.to_string();
    }

    if parsed.username().is_empty() && parsed.password().is_none() {
        return url.to_string();
    }

    if parsed.set_password(None).is_err() || parsed.set_username("***").is_err() {
        return "<redacted>".to_string();
    }

    parsed.to_string()
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl TryFrom<&str> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        GitUrl::new(url)
    }
}
