//! AWS-oriented adapters and handler for the scheduled config export.
//!
//! This crate owns runtime integration details (the Lambda handler and the
//! inventory/storage adapter seams). Deterministic export logic lives in
//! `config_export_core`.

pub mod adapters;
pub mod handlers;
pub mod logging;
