//! Error types for authkeys

use thiserror::Error;

/// Main error type for authkeys
#[derive(Error, Debug)]
pub enum Error {
    #[error("User lookup failed: {0}")]
    UserLookup(String),

    #[error("Invalid key specification '{line}': {reason}")]
    InvalidKeySpec { line: String, reason: String },

    #[error("Invalid option string: {0}")]
    InvalidOptionString(String),

    #[error("{context}: {source}")]
    FileIo {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace '{path}': {source}")]
    AtomicRename {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an I/O error with a description of what was being attempted
    pub fn file_io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::FileIo {
            context: context.into(),
            source,
        }
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
