pub mod neox_config;
pub mod shared_source;
pub mod sync_outcome;

pub use neox_config::{NeoxConfig, CONFIG_FILE_NAME};
pub use shared_source::{SourceSpec, DEFAULT_BRANCH, DEFAULT_OUT_DIR};
pub use sync_outcome::{DriftStatus, ErrorDetail, ErrorKind, Outcome, RunMode, SyncAction};
