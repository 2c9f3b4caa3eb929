//! tcptune Error Types
//!
//! Uniform error handling for socket option lookups and OS-level failures.

use std::io;
use thiserror::Error;

use crate::option::LogicalOption;

/// Main error type for tcptune operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TcpTuneError {
    /// The host OS is not one of the supported families
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The logical option has no identifier on this OS / OS version
    #[error("Unknown option {option} on {os}")]
    UnknownOption { option: LogicalOption, os: String },

    /// Native socket option call failed
    #[error("Socket option call failed with OS error code {code}")]
    OsSocketError { code: i32 },

    /// Raw getsockopt/setsockopt returned nonzero
    #[error("Socket option syscall error value: {code} (errno: {errno:?})")]
    SystemCallError { code: i32, errno: Option<i32> },

    /// A configuration value outside the accepted range
    #[error("Invalid value for {option}: {value}")]
    InvalidValue { option: LogicalOption, value: i32 },
}

/// Result type alias for tcptune operations
pub type Result<T> = std::result::Result<T, TcpTuneError>;

impl TcpTuneError {
    /// Create an unknown option error for the given OS name
    pub fn unknown_option(option: LogicalOption, os: impl Into<String>) -> Self {
        Self::UnknownOption {
            option,
            os: os.into(),
        }
    }

    /// Check if this error means "not available here" rather than a failure
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPlatform(_) | Self::UnknownOption { .. }
        )
    }

    /// Check if this error came back from the operating system
    #[must_use]
    pub const fn is_os_failure(&self) -> bool {
        matches!(
            self,
            Self::OsSocketError { .. } | Self::SystemCallError { .. }
        )
    }

    /// The raw code reported by the OS or system call, if any
    #[must_use]
    pub const fn raw_code(&self) -> Option<i32> {
        match self {
            Self::OsSocketError { code } | Self::SystemCallError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<TcpTuneError> for io::Error {
    fn from(err: TcpTuneError) -> Self {
        match err {
            TcpTuneError::OsSocketError { code } => io::Error::from_raw_os_error(code),
            TcpTuneError::SystemCallError {
                errno: Some(errno), ..
            } => io::Error::from_raw_os_error(errno),
            TcpTuneError::UnsupportedPlatform(_) | TcpTuneError::UnknownOption { .. } => {
                io::Error::new(io::ErrorKind::Unsupported, err)
            }
            TcpTuneError::InvalidValue { .. } => io::Error::new(io::ErrorKind::InvalidInput, err),
            TcpTuneError::SystemCallError { errno: None, .. } => io::Error::other(err),
        }
    }
}
