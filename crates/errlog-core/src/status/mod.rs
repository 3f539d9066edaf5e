//! Bit-packed error status codes.
//!
//! A `Status` is a `u32` packed as:
//!
//! ```text
//! ┌───────┬─────────┬───────┬──────────┬──────────────┬──────────────────┐
//! │ 31    │ 30 - 29 │ 28    │ 27 - 24  │ 23 - 16      │ 15 - 0           │
//! │ ERROR │ TYPE    │ FATAL │ reserved │ MODULE (u8)  │ CODE (u16)       │
//! └───────┴─────────┴───────┴──────────┴──────────────┴──────────────────┘
//! ```
//!
//! - `ERROR` is set on every error status, so the value is negative when
//!   read as `i32`. `0` is [`SUCCESS`].
//! - `TYPE` is one of [`ErrorType`].
//! - `FATAL` is set by the reporter on records produced by `log_fatal`.
//!
//! The layout is persisted by the history writer and must stay stable.
//!
//! # Code Ranges
//!
//! | Range          | Purpose                                   |
//! |----------------|-------------------------------------------|
//! | `0`            | Success / no error                        |
//! | `1 - 255`      | POSIX errno values (`ErrorType::Posix`)   |
//! | `256 - 0x0FFF` | System error codes ([`ErrorCode`] consts) |
//! | `0x1000+`      | Free for custom codes (`ErrorType::Custom`)|

mod code;
mod module;
mod predefined;

pub use code::ErrorCode;
pub use module::Module;
pub use predefined::*;

use core::fmt;

pub const ERROR_BIT: u32 = 1 << 31;

pub const TYPE_POS: u32 = 29;
pub const TYPE_MASK: u32 = 0x6000_0000;

pub const FATAL_BIT: u32 = 1 << 28;

pub const MODULE_POS: u32 = 16;
pub const MODULE_MASK: u32 = 0x00FF_0000;

pub const CODE_POS: u32 = 0;
pub const CODE_MASK: u32 = 0x0000_FFFF;

/// Origin of an error code.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    System = 0,
    Custom = 1,
    Posix = 3,
}

impl ErrorType {
    /// Decode the 2-bit TYPE field. The unassigned value `2` reads as `Custom`.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => ErrorType::System,
            3 => ErrorType::Posix,
            _ => ErrorType::Custom,
        }
    }
}

/// Packed status: error type, module, reason code and fatal flag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Status(u32);

/// No error.
pub const SUCCESS: Status = Status(0);

impl Status {
    /// Compose a status from its parts.
    #[inline]
    pub const fn new(ty: ErrorType, module: Module, code: ErrorCode) -> Self {
        Status(
            ERROR_BIT
                | (((ty as u32) << TYPE_POS) & TYPE_MASK)
                | (((module.as_u8() as u32) << MODULE_POS) & MODULE_MASK)
                | (((code.as_u16() as u32) << CODE_POS) & CODE_MASK),
        )
    }

    /// `MAKE_ERROR`: a system status for `module`.
    ///
    /// ```
    /// use errlog_core::status::{ErrorCode, Module, Status};
    /// let s = Status::system(Module::APPLICATION, ErrorCode::INVALID_ARGUMENT);
    /// assert_eq!(s.module(), Module::APPLICATION);
    /// assert_eq!(s.code(), ErrorCode::INVALID_ARGUMENT);
    /// ```
    #[inline]
    pub const fn system(module: Module, code: ErrorCode) -> Self {
        Self::new(ErrorType::System, module, code)
    }

    #[inline]
    pub const fn custom(module: Module, code: ErrorCode) -> Self {
        Self::new(ErrorType::Custom, module, code)
    }

    /// Status for a POSIX errno. Values outside `1..=255` are clamped into the field.
    #[inline]
    pub const fn posix(module: Module, errno: u8) -> Self {
        Self::new(ErrorType::Posix, module, ErrorCode::new(errno as u16))
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Status(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The status read as a signed value (negative for every error).
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self.0 as i32
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 & ERROR_BIT != 0
    }

    #[inline]
    pub const fn is_fatal(self) -> bool {
        self.0 & FATAL_BIT != 0
    }

    #[inline]
    pub const fn error_type(self) -> ErrorType {
        ErrorType::from_bits((self.0 & TYPE_MASK) >> TYPE_POS)
    }

    #[inline]
    pub const fn module(self) -> Module {
        Module::new(((self.0 & MODULE_MASK) >> MODULE_POS) as u8)
    }

    #[inline]
    pub const fn code(self) -> ErrorCode {
        ErrorCode::new(((self.0 & CODE_MASK) >> CODE_POS) as u16)
    }

    #[inline]
    pub const fn with_fatal(self) -> Self {
        Status(self.0 | FATAL_BIT)
    }

    #[inline]
    pub const fn without_fatal(self) -> Self {
        Status(self.0 & !FATAL_BIT)
    }

    /// Same error, reported from a different module.
    #[inline]
    pub const fn with_module(self, module: Module) -> Self {
        Status((self.0 & !MODULE_MASK) | (((module.as_u8() as u32) << MODULE_POS) & MODULE_MASK))
    }

    /// Turn a bare value into a well-formed error status.
    ///
    /// Anything without the ERROR bit (including `SUCCESS`) is treated as a
    /// reason code from an unknown module.
    #[inline]
    pub const fn normalize(self) -> Self {
        if self.is_error() {
            self
        } else {
            Self::system(Module::UNKNOWN, ErrorCode::new((self.0 & CODE_MASK) as u16))
        }
    }
}

impl From<u32> for Status {
    #[inline]
    fn from(raw: u32) -> Self {
        Status(raw)
    }
}

impl From<Status> for u32 {
    #[inline]
    fn from(status: Status) -> Self {
        status.0
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            return write!(f, "Status(SUCCESS)");
        }
        f.debug_struct("Status")
            .field("raw", &format_args!("{:#010x}", self.0))
            .field("type", &self.error_type())
            .field("module", &self.module())
            .field("code", &self.code())
            .field("fatal", &self.is_fatal())
            .finish()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl fmt::LowerHex for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
