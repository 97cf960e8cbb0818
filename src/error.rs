use std::io;
use thiserror::Error;

/// Custom error type for scantool
#[derive(Error, Debug)]
pub enum DiagError {
    /// An enumeration step failed; the whole collector call is aborted.
    #[error("Failed to retrieve {what}: {source}")]
    Collection {
        what: &'static str,
        #[source]
        source: Box<DiagError>,
    },

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Explanation gateway error: {0}")]
    Gateway(String),
}

/// Result type alias for scantool
pub type Result<T> = std::result::Result<T, DiagError>;

impl DiagError {
    /// Wrap a lower-level failure as a collection error for `what`
    pub fn collection(what: &'static str, source: DiagError) -> Self {
        DiagError::Collection {
            what,
            source: Box::new(source),
        }
    }

    /// Create a probe error
    pub fn probe<S: Into<String>>(msg: S) -> Self {
        DiagError::Probe(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        DiagError::Config(msg.into())
    }

    pub fn gateway<S: Into<String>>(msg: S) -> Self {
        DiagError::Gateway(msg.into())
    }
}
