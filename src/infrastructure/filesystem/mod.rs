pub mod config_store;
pub mod workdir;

pub use config_store::ConfigStore;
