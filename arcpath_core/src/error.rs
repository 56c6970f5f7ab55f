//! Error types for arcpath_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using arcpath_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during path, directory and checksum operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An argument was empty or zero-sized where a value is required.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A required path component was not present.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// A scratch buffer could not be reserved.
    #[error("Out of memory: could not reserve {bytes} bytes")]
    OutOfMemory { bytes: usize },

    /// An input violated an internal precondition.
    #[error("Internal error: {reason}")]
    Internal { reason: String },

    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Creating one directory level failed.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Reading failed part way through a checksum scan.
    ///
    /// `partial` holds the checksum of the bytes read before the failure.
    #[error("Read failed while checksumming {path} (partial crc {partial:08x}): {source}")]
    ChecksumRead {
        path: PathBuf,
        partial: u32,
        source: std::io::Error,
    },

    /// File contents do not match the expected checksum.
    #[error("Checksum mismatch for {path}: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: u32,
        actual: u32,
    },

    /// Configuration value or file is invalid.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a NotFound error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound { what: what.into() }
    }

    /// Create an OutOfMemory error.
    pub fn out_of_memory(bytes: usize) -> Self {
        Error::OutOfMemory { bytes }
    }

    /// Create an Internal error.
    pub fn internal(reason: impl Into<String>) -> Self {
        Error::Internal {
            reason: reason.into(),
        }
    }

    /// Create a CreateDir error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create a ChecksumRead error.
    pub fn checksum_read(path: impl Into<PathBuf>, partial: u32, source: std::io::Error) -> Self {
        Error::ChecksumRead {
            path: path.into(),
            partial,
            source,
        }
    }

    /// Create a ChecksumMismatch error.
    pub fn checksum_mismatch(path: impl Into<PathBuf>, expected: u32, actual: u32) -> Self {
        Error::ChecksumMismatch {
            path: path.into(),
            expected,
            actual,
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// The checksum accumulated before a read failure, if this error carries one.
    ///
    /// Only meaningful as a diagnostic; a failed scan never yields a trusted value.
    pub fn partial_checksum(&self) -> Option<u32> {
        match self {
            Error::ChecksumRead { partial, .. } => Some(*partial),
            _ => None,
        }
    }
}

// Additional From implementations for external error types

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_checksum_only_on_read_errors() {
        let err = Error::checksum_read("a.bin", 0xdeadbeef, std::io::Error::other("boom"));
        assert_eq!(err.partial_checksum(), Some(0xdeadbeef));

        let err = Error::not_found("separator");
        assert_eq!(err.partial_checksum(), None);
    }

    #[test]
    fn test_display_formats_checksums_as_hex() {
        let err = Error::checksum_mismatch("a.bin", 0x1, 0xcbf43926);
        assert_eq!(
            err.to_string(),
            "Checksum mismatch for a.bin: expected 00000001, got cbf43926"
        );
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io { .. }));
    }
}
