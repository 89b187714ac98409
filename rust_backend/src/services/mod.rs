//! Service layer: summary building, reconciliation and batch orchestration.
//!
//! These services sit on top of the parsers. They join the parsed documents
//! into flat summaries, compare them with recorded reference rows and drive
//! both steps over many programs.

pub mod batch;
pub mod compare;
pub mod summary;

#[cfg(test)]
mod compare_tests;

pub use batch::{process_program, process_programs, reconcile_outcomes, ProgramOutcome, SummaryCheck};
pub use compare::{reconcile, values_equal, CompareOptions, Reconciliation};
pub use summary::build_summaries;
