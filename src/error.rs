use crate::page_range::PageSet;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = PickError> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum PickError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("No output path specified")]
    MissingOutputPath,

    #[error("Output path {} is the same file as the input", .0.display())]
    SameFile(PathBuf),

    #[error("No valid pages to include (document has {total_pages} pages, requested {requested})")]
    NoValidPages {
        total_pages: u32,
        requested: PageSet,
    },

    #[error("Failed to open PDF: {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("{mode} failed: {message}")]
    TransformFailed {
        mode: &'static str,
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl PickError {
    pub fn open(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        PickError::Open {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        PickError::Io {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Errors the user can fix by changing their input, as opposed to I/O
    /// failures from the filesystem or the PDF libraries.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            PickError::InvalidFormat(_)
                | PickError::MissingOutputPath
                | PickError::SameFile(_)
                | PickError::NoValidPages { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_correctable() {
        assert!(PickError::InvalidFormat("x".into()).is_user_correctable());
        assert!(PickError::MissingOutputPath.is_user_correctable());
        assert!(!PickError::UnknownMode("x".into()).is_user_correctable());
        assert!(!PickError::io("a.pdf", "disk full").is_user_correctable());
    }

    #[test]
    fn test_open_error_keeps_cause() {
        let err = PickError::open("a.pdf", "not a PDF");
        assert_eq!(err.to_string(), "Failed to open PDF: a.pdf");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("not a PDF"));
    }
}
