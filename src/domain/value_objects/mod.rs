pub mod exclude_path;
pub mod git_url;

pub use exclude_path::{ExcludePath, ExcludePathError};
pub use git_url::{redact_url, GitUrl, GitUrlError};
