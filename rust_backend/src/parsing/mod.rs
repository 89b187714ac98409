//! Parsers for proposal (APT) and visit status (VSR) XML exports.
//!
//! # Parsers
//!
//! - [`xml_tree`]: Owned element tree with namespace-aware lookups
//! - [`text`]: Placeholder-aware text normalization
//! - [`templates`]: Instrument template extractors
//! - [`apt_parser`]: Proposal information, targets and observations
//! - [`vsr_parser`]: Visit status reports
//!
//! # Example
//!
//! ```no_run
//! use trexolists::parsing::apt_parser::parse_apt_file;
//! use std::path::Path;
//!
//! let apt = parse_apt_file(Path::new("PPS/APT/2734_APT.xml"), "2734", None)
//!     .expect("Failed to parse APT file");
//! println!("{} observations", apt.requests.len());
//! ```

pub mod apt_parser;
pub mod templates;
pub mod text;
pub mod vsr_parser;
pub mod xml_tree;

#[cfg(test)]
mod vsr_parser_tests;

pub use apt_parser::{parse_apt, parse_apt_file, parse_apt_str, AptDocument};
pub use vsr_parser::{parse_vsr, parse_vsr_file, parse_vsr_str, VsrDocument};
pub use xml_tree::XmlNode;
