/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - SCM operations (git subprocesses)
/// - File system operations (config file, working directories)
pub mod filesystem;
pub mod scm;

// Re-export commonly used types
pub use filesystem::config_store::ConfigStore;
pub use scm::{GitScm, ScmError, VersionControlClient};
