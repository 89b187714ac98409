//! Core domain models and error types.
//!
//! This module defines the data structures shared across the crate: template
//! records, proposal targets, visit status entries and the flat summary rows
//! used for reconciliation.

pub mod domain;
pub mod error;

pub use error::{ConfigError, DateParseError, DocumentError, ExtractError, FetchError, PipelineError};
