//! Error types for document parsing, fetching and configuration.

use std::path::PathBuf;

use crate::io::loaders::DocumentKind;

/// Errors raised while extracting one instrument template.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("expected a {expected} template, found <{found}>")]
    UnexpectedTag { expected: String, found: String },

    #[error("invalid {field} value {value:?} in {kind} template")]
    InvalidValue {
        kind: String,
        field: String,
        value: String,
    },
}

/// Errors that make a whole APT or VSR document unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("document has no root element")]
    EmptyDocument,

    #[error("observation {observation}: {source}")]
    Template {
        observation: String,
        #[source]
        source: ExtractError,
    },
}

/// A date string in none of the recognized visit-report formats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized date {input:?}")]
pub struct DateParseError {
    pub input: String,
}

/// I/O failure while retrieving a document.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors loading the TOML configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no configuration file found; searched: {0}")]
    NotFound(String),
}

/// Failure of one program in a batch run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{kind} document: {source}")]
    Document {
        kind: DocumentKind,
        #[source]
        source: DocumentError,
    },
}

pub type DocumentResult<T> = Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_message_includes_observation() {
        let err = DocumentError::Template {
            observation: "3".to_string(),
            source: ExtractError::InvalidValue {
                kind: "MiriLRS".to_string(),
                field: "Groups".to_string(),
                value: "many".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.contains("observation 3"));
        assert!(message.contains("Groups"));
        assert!(message.contains("\"many\""));
    }

    #[test]
    fn test_fetch_error_names_path() {
        let err = FetchError::Io {
            path: PathBuf::from("/data/PPS/APT/1201_APT.xml"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("1201_APT.xml"));
    }
}
