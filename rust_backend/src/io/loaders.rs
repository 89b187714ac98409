use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::error::FetchError;

/// The two document types retrieved per program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentKind {
    Apt,
    Vsr,
}

impl DocumentKind {
    /// Sub-directory of the work directory holding this kind.
    pub fn directory(&self) -> PathBuf {
        match self {
            DocumentKind::Apt => Path::new("PPS").join("APT"),
            DocumentKind::Vsr => Path::new("PPS").join("VSR"),
        }
    }

    /// File name for a program, e.g. `2734_APT.xml`.
    pub fn file_name(&self, program_id: u32) -> String {
        format!("{}_{}.xml", program_id, self)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Apt => f.write_str("APT"),
            DocumentKind::Vsr => f.write_str("VSR"),
        }
    }
}

/// Supplies raw document text for a program.
///
/// `Ok(None)` means the document does not exist; errors are reserved for
/// failures reading a document that does.
pub trait DocumentSource {
    fn fetch(&self, kind: DocumentKind, program_id: u32) -> Result<Option<String>, FetchError>;
}

/// Documents stored under `<work_dir>/PPS/APT` and `<work_dir>/PPS/VSR`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    work_dir: PathBuf,
}

impl DirectorySource {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn path_for(&self, kind: DocumentKind, program_id: u32) -> PathBuf {
        self.work_dir
            .join(kind.directory())
            .join(kind.file_name(program_id))
    }

    pub fn has_document(&self, kind: DocumentKind, program_id: u32) -> bool {
        self.path_for(kind, program_id).is_file()
    }
}

impl DocumentSource for DirectorySource {
    fn fetch(&self, kind: DocumentKind, program_id: u32) -> Result<Option<String>, FetchError> {
        let path = self.path_for(kind, program_id);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FetchError::Io { path, source }),
        }
    }
}

/// In-memory documents keyed by kind and program.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<(DocumentKind, u32), String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: DocumentKind, program_id: u32, content: impl Into<String>) {
        self.documents.insert((kind, program_id), content.into());
    }

    pub fn with(mut self, kind: DocumentKind, program_id: u32, content: impl Into<String>) -> Self {
        self.insert(kind, program_id, content);
        self
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, kind: DocumentKind, program_id: u32) -> Result<Option<String>, FetchError> {
        Ok(self.documents.get(&(kind, program_id)).cloned())
    }
}
