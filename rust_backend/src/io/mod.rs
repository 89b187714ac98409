//! Document retrieval and reference-table loading.
//!
//! [`loaders`] supplies raw APT/VSR text through the [`DocumentSource`]
//! trait; [`reference`] reads previously recorded summary rows from CSV.
//!
//! # Example
//!
//! ```no_run
//! use trexolists::io::{DirectorySource, DocumentKind, DocumentSource};
//!
//! let source = DirectorySource::new(".");
//! if let Some(xml) = source.fetch(DocumentKind::Apt, 2734).expect("Failed to read") {
//!     println!("{} bytes", xml.len());
//! }
//! ```

pub mod loaders;
pub mod reference;


pub use loaders::{DirectorySource, DocumentKind, DocumentSource, MemorySource};
pub use reference::{ReferenceKeys, ReferenceTable};
