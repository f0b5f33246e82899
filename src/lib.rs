//! # neox - Shared source synchronizer
//!
//! `neox` keeps directories of a project mirrored against remote git
//! repositories ("shared sources") declared in `neoX.config.json`.
//!
//! ## Features
//!
//! - **Pull**: Clone each shared source, falling back to `git pull` when the directory exists
//! - **Exclude**: Remove configured paths after every fetch
//! - **Detached copies**: Strip `.git` from non-submodule sources
//! - **Check**: Compare the local head with the remote without touching the working tree
//! - **Batch execution**: Process entries in parallel with per-entry fault isolation
//!
//! ## Quick Start
//!
//! 1. Create the config file:
//!
//! ```bash
//! neox init
//! ```
//!
//! 2. Declare shared sources (`neoX.config.json`):
//!
//! ```json
//! {
//!   "shared": [
//!     {
//!       "repo": "https://github.com/example/shared-ui.git",
//!       "outDir": "src/shared",
//!       "isSubmodule": true,
//!       "exclude": ["README.md"]
//!     }
//!   ]
//! }
//! ```
//!
//! 3. Pull every source, then check for drift later:
//!
//! ```bash
//! neox pull --all
//! neox check
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: Config entries and per-entry results
//! - [`application`]: Reconciler, drift checker and batch runner
//! - [`infrastructure`]: git subprocesses, config file and working directories
//! - [`presentation`]: CLI interface and terminal rendering
//! - [`common`]: Shared utilities and error handling
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use neox::application::services::progress::NoopProgress;
//! use neox::application::use_cases::batch_runner::{BatchRunner, Selection};
//! use neox::domain::entities::sync_outcome::RunMode;
//! use neox::infrastructure::{ConfigStore, GitScm};
//!
//! # async fn example() -> neox::Result<()> {
//! let config = ConfigStore::new().load("neoX.config.json").await?;
//! let runner = BatchRunner::new(Arc::new(GitScm::new()), Arc::new(NoopProgress));
//! let result = runner.run_all(&config.shared, RunMode::Check, &Selection::All).await;
//!
//! println!("{} need attention", result.attention_count());
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::NeoxError;
pub use crate::common::result::NeoxResult as Result;
