pub mod batch_runner;
pub mod drift_check;
pub mod init_config;
pub mod reconcile_source;

pub use batch_runner::{BatchResult, BatchRunner, Selection};
pub use drift_check::DriftCheckUseCase;
pub use init_config::InitConfigUseCase;
pub use reconcile_source::ReconcileSourceUseCase;
