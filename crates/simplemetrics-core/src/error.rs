//! Shared error type across simplemetrics crates.

use std::io;

use thiserror::Error;

/// Stable error codes, independent of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// I/O class failure (persist cycle fault).
    Io,
    /// A sink rejected a snapshot.
    Sink,
    /// An updater failed before the snapshot was taken.
    Updater,
    /// Descriptor is missing a required field.
    InvalidDescriptor,
    /// Configuration could not be parsed or is out of range.
    Config,
    /// Unsupported configuration version.
    UnsupportedVersion,
}

impl ErrorCode {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Io => "IO",
            ErrorCode::Sink => "SINK",
            ErrorCode::Updater => "UPDATER",
            ErrorCode::InvalidDescriptor => "INVALID_DESCRIPTOR",
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and manager.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("sink failed: {0}")]
    Sink(String),
    #[error("updater failed: {0}")]
    Updater(String),
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
}

impl MetricsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MetricsError::Io(_) => ErrorCode::Io,
            MetricsError::Sink(_) => ErrorCode::Sink,
            MetricsError::Updater(_) => ErrorCode::Updater,
            MetricsError::InvalidDescriptor(_) => ErrorCode::InvalidDescriptor,
            MetricsError::Config(_) => ErrorCode::Config,
            MetricsError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
        }
    }

    /// Re-wrap as an I/O error unless it already is one.
    pub fn into_io(self) -> MetricsError {
        match self {
            MetricsError::Io(e) => MetricsError::Io(e),
            other => MetricsError::Io(io::Error::other(other)),
        }
    }
}
