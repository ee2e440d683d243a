//! Shared config-export domain primitives.
//!
//! This crate owns the deterministic parts of the export: the query contract,
//! configuration, record parsing, flattening, output rendering and storage
//! keys. It intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod config;
pub mod contract;
pub mod flatten;
pub mod render;
pub mod result_set;
pub mod storage_keys;
