use crate::common::error::NeoxError;

/// neox全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use neox::common::result::NeoxResult;
/// use neox::common::error::NeoxError;
///
/// fn example_function() -> NeoxResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> NeoxResult<()> {
///     Err(NeoxError::internal_error("Something went wrong"))
/// }
/// ```
pub type NeoxResult<T> = Result<T, NeoxError>;

/// OptionをNeoxResultに変換するためのヘルパー
pub trait OptionExt<T> {
    /// `None`の場合は設定エラー（`InvalidConfig`）を返す
    ///
    /// # Examples
    ///
    /// ```
    /// use neox::common::result::{NeoxResult, OptionExt};
    ///
    /// let exclude: Option<Vec<String>> = None;
    /// let result: NeoxResult<Vec<String>> =
    ///     exclude.ok_or_invalid_config("exclude", "key is required");
    /// assert!(result.is_err());
    /// ```
    fn ok_or_invalid_config(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> NeoxResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_invalid_config(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> NeoxResult<T> {
        self.ok_or_else(|| NeoxError::invalid_config(field, message))
    }
}

/// 標準のResult型をNeoxResultに変換するためのヘルパー
pub trait ResultExt<T, E> {
    /// ファイルシステムエラーとしてNeoxResultに変換
    ///
    /// # Examples
    ///
    /// ```
    /// use neox::common::result::{NeoxResult, ResultExt};
    ///
    /// let result: Result<String, std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::PermissionDenied, "denied"
    /// ));
    /// let neox_result: NeoxResult<String> = result.with_filesystem_error("read failed", None);
    /// assert!(neox_result.is_err());
    /// ```
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> NeoxResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> NeoxResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| NeoxError::filesystem_error_with_source(message, path, e.into()))
    }
}
