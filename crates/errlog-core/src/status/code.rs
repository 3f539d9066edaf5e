//! Reason codes for the 16-bit CODE field.
//!
//! System codes start at [`ErrorCode::SYSTEM_BASE`]; `1..=255` is left for
//! POSIX errno values.

use core::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct ErrorCode(u16);

impl ErrorCode {
    pub const SYSTEM_BASE: u16 = 256;
    pub const CUSTOM_BASE: u16 = 0x1000;

    #[inline]
    pub const fn new(code: u16) -> Self {
        ErrorCode(code)
    }

    /// A system code at `offset` from [`ErrorCode::SYSTEM_BASE`].
    #[inline]
    pub const fn system(offset: u16) -> Self {
        ErrorCode(Self::SYSTEM_BASE + offset)
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_posix(self) -> bool {
        self.0 >= 1 && self.0 < Self::SYSTEM_BASE
    }

    // ── General ───────────────────────────────────────────────────

    pub const UNKNOWN: ErrorCode = ErrorCode::system(0);
    pub const INVALID_ARGUMENT: ErrorCode = ErrorCode::system(1);
    pub const INVALID_DATA_DETECTED: ErrorCode = ErrorCode::system(2);
    pub const INVALID_FORMAT: ErrorCode = ErrorCode::system(3);
    pub const INVALID_INDEX: ErrorCode = ErrorCode::system(4);
    pub const INVALID_SIZE: ErrorCode = ErrorCode::system(5);
    pub const INVALID_OPERATION: ErrorCode = ErrorCode::system(6);
    pub const ITEM_NOT_FOUND: ErrorCode = ErrorCode::system(7);
    pub const ACCESS_DENIED: ErrorCode = ErrorCode::system(8);
    pub const UNSUPPORTED: ErrorCode = ErrorCode::system(9);
    pub const BUFFER_FULL: ErrorCode = ErrorCode::system(10);
    pub const MEDIA_FULL: ErrorCode = ErrorCode::system(11);
    pub const ALREADY_IN_USE: ErrorCode = ErrorCode::system(12);
    pub const TIME_OUT: ErrorCode = ErrorCode::system(13);
    pub const NOT_READY: ErrorCode = ErrorCode::system(14);
    pub const FAILED_OPERATION: ErrorCode = ErrorCode::system(15);
    pub const OPERATION_PROHIBITED: ErrorCode = ErrorCode::system(16);
    pub const OPERATION_ABORTED: ErrorCode = ErrorCode::system(17);
    pub const WRITE_PROTECTED: ErrorCode = ErrorCode::system(18);
    pub const NO_RESPONSE: ErrorCode = ErrorCode::system(19);

    // ── Synchronization ───────────────────────────────────────────

    pub const SEMAPHORE_LOCK_FAILED: ErrorCode = ErrorCode::system(20);
    pub const MUTEX_LOCK_FAILED: ErrorCode = ErrorCode::system(21);
    pub const SEMAPHORE_UNLOCK_FAILED: ErrorCode = ErrorCode::system(22);
    pub const MUTEX_UNLOCK_FAILED: ErrorCode = ErrorCode::system(23);

    // ── I/O ───────────────────────────────────────────────────────

    pub const CRC_ERROR: ErrorCode = ErrorCode::system(24);
    pub const OPEN_FAILED: ErrorCode = ErrorCode::system(25);
    pub const CLOSE_FAILED: ErrorCode = ErrorCode::system(26);
    pub const READ_FAILED: ErrorCode = ErrorCode::system(27);
    pub const WRITE_FAILED: ErrorCode = ErrorCode::system(28);
    pub const INITIALIZATION_FAILED: ErrorCode = ErrorCode::system(29);
    pub const BOOT_FAILURE: ErrorCode = ErrorCode::system(30);

    // ── Resources ─────────────────────────────────────────────────

    pub const OUT_OF_MEMORY: ErrorCode = ErrorCode::system(31);
    pub const OUT_OF_RESOURCES: ErrorCode = ErrorCode::system(32);
    pub const ALLOC_FAILED: ErrorCode = ErrorCode::system(33);
    pub const FREE_FAILED: ErrorCode = ErrorCode::system(34);
    pub const OVERFLOW: ErrorCode = ErrorCode::system(35);
    pub const UNDERFLOW: ErrorCode = ErrorCode::system(36);
    pub const STACK_OVERFLOW: ErrorCode = ErrorCode::system(37);
    pub const ISR_QUEUE_OVERFLOW: ErrorCode = ErrorCode::system(38);
    pub const TIMER_QUEUE_OVERFLOW: ErrorCode = ErrorCode::system(39);

    // ── Threads / context ─────────────────────────────────────────

    pub const CREATE_FAILED: ErrorCode = ErrorCode::system(43);
    pub const DELETE_FAILED: ErrorCode = ErrorCode::system(44);
    pub const THREAD_CREATE_FAILED: ErrorCode = ErrorCode::system(45);
    pub const THREAD_DELETE_FAILED: ErrorCode = ErrorCode::system(46);
    pub const PROHIBITED_IN_ISR_CONTEXT: ErrorCode = ErrorCode::system(47);

    /// Short name for the known system codes.
    pub const fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::UNKNOWN => "UNKNOWN",
            Self::INVALID_ARGUMENT => "INVALID_ARGUMENT",
            Self::INVALID_DATA_DETECTED => "INVALID_DATA_DETECTED",
            Self::INVALID_FORMAT => "INVALID_FORMAT",
            Self::INVALID_INDEX => "INVALID_INDEX",
            Self::INVALID_SIZE => "INVALID_SIZE",
            Self::INVALID_OPERATION => "INVALID_OPERATION",
            Self::ITEM_NOT_FOUND => "ITEM_NOT_FOUND",
            Self::ACCESS_DENIED => "ACCESS_DENIED",
            Self::UNSUPPORTED => "UNSUPPORTED",
            Self::BUFFER_FULL => "BUFFER_FULL",
            Self::MEDIA_FULL => "MEDIA_FULL",
            Self::ALREADY_IN_USE => "ALREADY_IN_USE",
            Self::TIME_OUT => "TIME_OUT",
            Self::NOT_READY => "NOT_READY",
            Self::FAILED_OPERATION => "FAILED_OPERATION",
            Self::OPERATION_PROHIBITED => "OPERATION_PROHIBITED",
            Self::OPERATION_ABORTED => "OPERATION_ABORTED",
            Self::WRITE_PROTECTED => "WRITE_PROTECTED",
            Self::NO_RESPONSE => "NO_RESPONSE",
            Self::SEMAPHORE_LOCK_FAILED => "SEMAPHORE_LOCK_FAILED",
            Self::MUTEX_LOCK_FAILED => "MUTEX_LOCK_FAILED",
            Self::SEMAPHORE_UNLOCK_FAILED => "SEMAPHORE_UNLOCK_FAILED",
            Self::MUTEX_UNLOCK_FAILED => "MUTEX_UNLOCK_FAILED",
            Self::CRC_ERROR => "CRC_ERROR",
            Self::OPEN_FAILED => "OPEN_FAILED",
            Self::CLOSE_FAILED => "CLOSE_FAILED",
            Self::READ_FAILED => "READ_FAILED",
            Self::WRITE_FAILED => "WRITE_FAILED",
            Self::INITIALIZATION_FAILED => "INITIALIZATION_FAILED",
            Self::BOOT_FAILURE => "BOOT_FAILURE",
            Self::OUT_OF_MEMORY => "OUT_OF_MEMORY",
            Self::OUT_OF_RESOURCES => "OUT_OF_RESOURCES",
            Self::ALLOC_FAILED => "ALLOC_FAILED",
            Self::FREE_FAILED => "FREE_FAILED",
            Self::OVERFLOW => "OVERFLOW",
            Self::UNDERFLOW => "UNDERFLOW",
            Self::STACK_OVERFLOW => "STACK_OVERFLOW",
            Self::ISR_QUEUE_OVERFLOW => "ISR_QUEUE_OVERFLOW",
            Self::TIMER_QUEUE_OVERFLOW => "TIMER_QUEUE_OVERFLOW",
            Self::CREATE_FAILED => "CREATE_FAILED",
            Self::DELETE_FAILED => "DELETE_FAILED",
            Self::THREAD_CREATE_FAILED => "THREAD_CREATE_FAILED",
            Self::THREAD_DELETE_FAILED => "THREAD_DELETE_FAILED",
            Self::PROHIBITED_IN_ISR_CONTEXT => "PROHIBITED_IN_ISR_CONTEXT",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None if self.is_posix() => write!(f, "errno({})", self.0),
            None => write!(f, "ErrorCode({})", self.0),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}
