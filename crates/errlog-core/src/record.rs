//! Error record: one logged warning or fatal error.

use core::fmt;
use core::panic::Location;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::status::Status;

/// Process-wide sequence counter. Never reset, so sequence numbers stay
/// unique across clears and across reporters.
static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Take the next sequence number.
#[inline]
pub fn next_sequence() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Severity of a record, mirrored by the FATAL bit of its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Fatal,
}

/// A single error occurrence. Plain data, `Copy`, never mutated after creation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ErrorRecord {
    pub status: Status,
    /// Caller-supplied context value.
    pub value: usize,
    /// OS thread id of the reporting thread.
    pub thread_id: u64,
    /// Call site, when location capture is enabled.
    pub location: Option<&'static Location<'static>>,
    pub message: &'static str,
    pub sequence: u64,
}

impl ErrorRecord {
    #[inline]
    pub fn severity(&self) -> Severity {
        if self.status.is_fatal() {
            Severity::Fatal
        } else {
            Severity::Warning
        }
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.status.is_fatal()
    }
}

impl fmt::Debug for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ErrorRecord");
        d.field("sequence", &self.sequence);
        d.field("status", &self.status);
        d.field("value", &format_args!("{:#x}", self.value));
        d.field("thread_id", &self.thread_id);
        if let Some(loc) = self.location {
            d.field("location", &format_args!("{}:{}", loc.file(), loc.line()));
        }
        if !self.message.is_empty() {
            d.field("message", &self.message);
        }
        d.finish()
    }
}

/// Multi-line report, printed on the fatal path.
impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "++ Error Info ++")?;
        writeln!(
            f,
            "{}: {:#010X} Module: {} Code: {}",
            match self.severity() {
                Severity::Warning => "Warning",
                Severity::Fatal => "Error Status",
            },
            self.status.raw(),
            self.status.module(),
            self.status.code()
        )?;
        if !self.message.is_empty() {
            writeln!(f, "Error Message: {}", self.message)?;
        }
        if let Some(loc) = self.location {
            writeln!(f, "Location: {}:{}", loc.file(), loc.line())?;
        }
        writeln!(f, "Error Value: {:#X}", self.value)?;
        writeln!(f, "Thread Id: {:#X}", self.thread_id)?;
        write!(f, "Sequence: {}", self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{self, ErrorCode, Module};

    fn record(status: Status, value: usize) -> ErrorRecord {
        ErrorRecord {
            status,
            value,
            thread_id: 7,
            location: Some(Location::caller()),
            message: "test",
            sequence: next_sequence(),
        }
    }

    #[test]
    fn test_sequence_is_strictly_increasing() {
        let a = next_sequence();
        let b = next_sequence();
        let c = next_sequence();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_severity_follows_fatal_bit() {
        let w = record(status::TIME_OUT, 1);
        assert_eq!(w.severity(), Severity::Warning);
        let f = record(status::TIME_OUT.with_fatal(), 1);
        assert_eq!(f.severity(), Severity::Fatal);
        assert!(f.is_fatal());
    }

    #[test]
    fn test_report_contains_fields() {
        let r = record(Status::system(Module::DRIVER_I2C, ErrorCode::OPERATION_PROHIBITED).with_fatal(), 0xDEAD_DEAD);
        let text = format!("{}", r);
        assert!(text.contains("Module: DRIVER_I2C"));
        assert!(text.contains("Code: OPERATION_PROHIBITED"));
        assert!(text.contains("Error Value: 0xDEADDEAD"));
        assert!(text.contains("Error Message: test"));
        assert!(text.contains("record.rs"));
    }
}
