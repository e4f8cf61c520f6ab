//! Error types for Render Tools
//!
//! Only device-level failures travel through this channel. Misuse of the
//! buffer API (bad bounds, illegal flags, double initialization, ...) is a
//! caller bug and panics at the point of call instead.

use std::fmt;

use crate::device::DeviceError;

/// Result type for Render Tools operations
pub type Result<T> = std::result::Result<T, Error>;

/// Render Tools errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (lock poisoning, missing backend state, ...)
    BackendError(String),

    /// Out of device memory
    OutOfMemory,

    /// Invalid resource (unknown handle, destroyed buffer, ...)
    InvalidResource(String),

    /// The device reported an error right after `operation`
    Device {
        operation: &'static str,
        code: DeviceError,
    },
}

impl Error {
    /// Build the error matching a device error code reported after `operation`
    pub(crate) fn from_device(operation: &'static str, code: DeviceError) -> Self {
        match code {
            DeviceError::OutOfMemory => Error::OutOfMemory,
            code => Error::Device { operation, code },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of device memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::Device { operation, code } => {
                write!(f, "Device error {} after {}", code.as_str(), operation)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
