//! Ready-made system statuses, all reported from [`Module::UNKNOWN`].
//!
//! Use [`Status::with_module`] or [`Status::system`] when the origin is known.

use super::{ErrorCode, Module, Status};

const fn unknown(code: ErrorCode) -> Status {
    Status::system(Module::UNKNOWN, code)
}

pub const UNKNOWN: Status = unknown(ErrorCode::UNKNOWN);
pub const INVALID_ARGUMENT: Status = unknown(ErrorCode::INVALID_ARGUMENT);
pub const INVALID_DATA_DETECTED: Status = unknown(ErrorCode::INVALID_DATA_DETECTED);
pub const INVALID_FORMAT: Status = unknown(ErrorCode::INVALID_FORMAT);
pub const INVALID_INDEX: Status = unknown(ErrorCode::INVALID_INDEX);
pub const INVALID_SIZE: Status = unknown(ErrorCode::INVALID_SIZE);
pub const INVALID_OPERATION: Status = unknown(ErrorCode::INVALID_OPERATION);
pub const ITEM_NOT_FOUND: Status = unknown(ErrorCode::ITEM_NOT_FOUND);
pub const ACCESS_DENIED: Status = unknown(ErrorCode::ACCESS_DENIED);
pub const UNSUPPORTED: Status = unknown(ErrorCode::UNSUPPORTED);
pub const BUFFER_FULL: Status = unknown(ErrorCode::BUFFER_FULL);
pub const MEDIA_FULL: Status = unknown(ErrorCode::MEDIA_FULL);
pub const ALREADY_IN_USE: Status = unknown(ErrorCode::ALREADY_IN_USE);
pub const TIME_OUT: Status = unknown(ErrorCode::TIME_OUT);
pub const NOT_READY: Status = unknown(ErrorCode::NOT_READY);
pub const FAILED_OPERATION: Status = unknown(ErrorCode::FAILED_OPERATION);
pub const OPERATION_PROHIBITED: Status = unknown(ErrorCode::OPERATION_PROHIBITED);
pub const OPERATION_ABORTED: Status = unknown(ErrorCode::OPERATION_ABORTED);
pub const WRITE_PROTECTED: Status = unknown(ErrorCode::WRITE_PROTECTED);
pub const NO_RESPONSE: Status = unknown(ErrorCode::NO_RESPONSE);
pub const OPEN_FAILED: Status = unknown(ErrorCode::OPEN_FAILED);
pub const CLOSE_FAILED: Status = unknown(ErrorCode::CLOSE_FAILED);
pub const READ_FAILED: Status = unknown(ErrorCode::READ_FAILED);
pub const WRITE_FAILED: Status = unknown(ErrorCode::WRITE_FAILED);
pub const OUT_OF_MEMORY: Status = unknown(ErrorCode::OUT_OF_MEMORY);
pub const OUT_OF_RESOURCES: Status = unknown(ErrorCode::OUT_OF_RESOURCES);
pub const OVERFLOW: Status = unknown(ErrorCode::OVERFLOW);
pub const PROHIBITED_IN_ISR_CONTEXT: Status = unknown(ErrorCode::PROHIBITED_IN_ISR_CONTEXT);
