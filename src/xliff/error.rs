use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing a catalog.
#[derive(Debug, Error)]
pub enum XliffError {
    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed document at byte {position}: {message}")]
    Malformed { position: usize, message: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl XliffError {
    pub(crate) fn malformed(position: usize, message: impl Into<String>) -> Self {
        XliffError::Malformed {
            position,
            message: message.into(),
        }
    }
}
