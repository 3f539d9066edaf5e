//! Error types for errlog operations

use core::fmt;

use crate::status::{ErrorCode, Module, Status};

/// Result type for errlog operations
pub type ErrlogResult<T> = Result<T, ErrlogError>;

/// Errors returned by the reporter, the hook dispatcher and the persister
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrlogError {
    /// No error has been logged since the last clear
    NotFound,

    /// History index past the current number of entries
    OutOfRange { index: usize, len: usize },

    /// Storage format/mount/open/write/close failed
    FailedOperation,

    /// Feature compiled out
    Unsupported,

    /// Persisted history could not be parsed
    InvalidFormat,
}

impl ErrlogError {
    /// The status code for this error, reported from the platform module.
    pub const fn status(&self) -> Status {
        let code = match self {
            ErrlogError::NotFound => ErrorCode::ITEM_NOT_FOUND,
            ErrlogError::OutOfRange { .. } => ErrorCode::INVALID_INDEX,
            ErrlogError::FailedOperation => ErrorCode::FAILED_OPERATION,
            ErrlogError::Unsupported => ErrorCode::UNSUPPORTED,
            ErrlogError::InvalidFormat => ErrorCode::INVALID_FORMAT,
        };
        Status::system(Module::PLATFORM, code)
    }
}

impl fmt::Display for ErrlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrlogError::NotFound => write!(f, "no error logged"),
            ErrlogError::OutOfRange { index, len } => {
                write!(f, "history index {} out of range (len {})", index, len)
            }
            ErrlogError::FailedOperation => write!(f, "operation failed"),
            ErrlogError::Unsupported => write!(f, "not supported in this build"),
            ErrlogError::InvalidFormat => write!(f, "invalid history format"),
        }
    }
}

impl std::error::Error for ErrlogError {}

impl From<ErrlogError> for Status {
    fn from(e: ErrlogError) -> Self {
        e.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", ErrlogError::NotFound), "no error logged");
        let e = ErrlogError::OutOfRange { index: 4, len: 2 };
        assert_eq!(format!("{}", e), "history index 4 out of range (len 2)");
    }

    #[test]
    fn test_error_status() {
        let s = ErrlogError::FailedOperation.status();
        assert_eq!(s.module(), Module::PLATFORM);
        assert_eq!(s.code(), ErrorCode::FAILED_OPERATION);

        let s: Status = ErrlogError::NotFound.into();
        assert_eq!(s.code(), ErrorCode::ITEM_NOT_FOUND);
    }
}
