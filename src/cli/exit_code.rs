//! Exit code definitions for authkeys
//!
//! Provides standardized exit codes for different error conditions.

use crate::error::Error;

/// Exit codes for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// General/unspecified error
    GeneralError = 1,
    /// Configuration error (invalid config file or values)
    ConfigError = 2,
    /// The account could not be resolved
    UserLookupError = 3,
    /// A requested key line or options string is invalid
    InvalidKeyError = 4,
    /// Reading, preparing or replacing the key file failed
    FileError = 5,
}

impl ExitCode {
    /// Pick the exit code for an error returned by a command
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<Error>() {
            Some(Error::Config(_)) => ExitCode::ConfigError,
            Some(Error::UserLookup(_)) => ExitCode::UserLookupError,
            Some(Error::InvalidKeySpec { .. } | Error::InvalidOptionString(_)) => {
                ExitCode::InvalidKeyError
            }
            Some(Error::FileIo { .. } | Error::AtomicRename { .. }) => ExitCode::FileError,
            None => ExitCode::GeneralError,
        }
    }
}

impl From<ExitCode> for u8 {
    fn from(code: ExitCode) -> Self {
        code as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
