use std::path::PathBuf;
use thiserror::Error;

use crate::infrastructure::scm::ScmError;

#[derive(Error, Debug)]
pub enum NeoxError {
    #[error("Config file could not be loaded: {}", path.display())]
    ConfigMissing {
        path: PathBuf,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Config file already exists: {}", path.display())]
    ConfigExists { path: PathBuf },

    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfig { field: String, message: String },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Remote fetch failed: {message}")]
    RemoteFetchError {
        message: String,
        url: Option<String>,
        #[source]
        source: Option<ScmError>,
    },

    #[error("Repository inspection failed: {message}")]
    RepositoryError {
        message: String,
        out_dir: Option<String>,
        #[source]
        source: Option<ScmError>,
    },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl NeoxError {
    pub fn config_missing_with_source(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigMissing {
            path: path.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn config_exists(path: impl Into<PathBuf>) -> Self {
        Self::ConfigExists { path: path.into() }
    }

    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn remote_fetch_error_with_source(
        message: impl Into<String>,
        url: Option<String>,
        source: ScmError,
    ) -> Self {
        Self::RemoteFetchError {
            message: message.into(),
            url,
            source: Some(source),
        }
    }

    pub fn repository_error_with_source(
        message: impl Into<String>,
        out_dir: Option<String>,
        source: ScmError,
    ) -> Self {
        Self::RepositoryError {
            message: message.into(),
            out_dir,
            source: Some(source),
        }
    }

    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            source: None,
        }
    }

    /// Text of the underlying cause chain, if any, joined with `": "`.
    pub fn cause_chain(&self) -> Option<String> {
        let mut causes = Vec::new();
        let mut current = std::error::Error::source(self);
        while let Some(err) = current {
            causes.push(err.to_string());
            current = err.source();
        }

        if causes.is_empty() {
            None
        } else {
            Some(causes.join(": "))
        }
    }
}

impl From<std::io::Error> for NeoxError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<serde_json::Error> for NeoxError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}

impl From<ScmError> for NeoxError {
    fn from(error: ScmError) -> Self {
        Self::remote_fetch_error_with_source("Version control operation failed", None, error)
    }
}
