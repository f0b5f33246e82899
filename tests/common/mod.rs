//! Common test utilities and helpers
//!
//! Shared by the integration tests: an in-process git double and
//! fixture builders for config files and directory snapshots.

#![allow(dead_code)]

pub mod fake_scm;
pub mod fixtures;
