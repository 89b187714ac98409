//! Trexolists - JWST transiting-exoplanet observation summaries.
//!
//! Parses APT proposal exports and visit status reports (VSR), joins them
//! into one flat summary per observation and reconciles those summaries
//! against a previously recorded reference table.

pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod services;
pub mod time;

pub use crate::config::TrexolistsConfig;
pub use crate::core::domain::{FieldValue, RecordRow, SummaryRecord, TargetFilter, TemplateKind};
