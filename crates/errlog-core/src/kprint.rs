//! Leveled diagnostics on stderr
//!
//! `printk`-style output for the parts of errlog that run on normal
//! threads: the persister, the fatal report, hook failures, the heap
//! volume. The logging path itself (`log_warning`, `clear_all`, queries)
//! never prints, since it must stay usable from signal handlers.
//!
//! Each call writes one whole line under the stderr lock. A print that
//! starts while the same thread is already inside one (a signal handler
//! that interrupted a print) is dropped instead of interleaved.
//!
//! # Environment Variables
//!
//! - `ERRLOG_LOG_LEVEL=<level>` - off, error, warn, info, debug, trace (or 0..5); default warn
//! - `ERRLOG_FLUSH_EPRINT=1` - Flush stderr after every line
//!
//! # Usage
//!
//! ```ignore
//! use errlog_core::{kinfo, kerror};
//!
//! kinfo!("saved {} records to {}", n, path);
//! kerror!("mount failed: {}", err);
//! ```

use std::cell::Cell;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::env::{env_get_bool, env_get_opt};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    const ALL: [LogLevel; 6] = [
        LogLevel::Off,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// Out-of-range values saturate to `Trace`.
    pub fn from_u8(v: u8) -> Self {
        Self::ALL[usize::from(v.min(5))]
    }

    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Line tag, padded to a common width.
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "errlog E ",
            LogLevel::Warn => "errlog W ",
            LogLevel::Info => "errlog I ",
            LogLevel::Debug => "errlog D ",
            LogLevel::Trace => "errlog T ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError;

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected off|error|warn|info|debug|trace or 0..5")
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return if n <= 5 { Ok(Self::from_u8(n)) } else { Err(ParseLevelError) };
        }
        Self::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s))
            .ok_or(ParseLevelError)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const DEFAULT_LEVEL: LogLevel = LogLevel::Warn;

static LEVEL: AtomicU8 = AtomicU8::new(DEFAULT_LEVEL as u8);
static FLUSH: AtomicBool = AtomicBool::new(false);
static CONFIGURED: AtomicBool = AtomicBool::new(false);

std::thread_local! {
    static PRINTING: Cell<bool> = const { Cell::new(false) };
}

/// Read `ERRLOG_LOG_LEVEL` and `ERRLOG_FLUSH_EPRINT`, once.
///
/// The first print does this implicitly; call it early so the environment
/// is never read from an awkward context.
pub fn init() {
    if CONFIGURED.swap(true, Ordering::SeqCst) {
        return;
    }
    let level = env_get_opt::<LogLevel>("ERRLOG_LOG_LEVEL").unwrap_or(DEFAULT_LEVEL);
    LEVEL.store(level as u8, Ordering::Relaxed);
    FLUSH.store(env_get_bool("ERRLOG_FLUSH_EPRINT", false), Ordering::Relaxed);
}

#[inline]
fn ensure_init() {
    if !CONFIGURED.load(Ordering::Relaxed) {
        init();
    }
}

#[inline]
pub fn log_level() -> LogLevel {
    ensure_init();
    LogLevel::from_u8(LEVEL.load(Ordering::Relaxed))
}

/// Override the level; the environment is no longer consulted. Returns
/// the level that was in effect.
pub fn set_log_level(level: LogLevel) -> LogLevel {
    CONFIGURED.store(true, Ordering::SeqCst);
    LogLevel::from_u8(LEVEL.swap(level as u8, Ordering::Relaxed))
}

#[inline]
pub fn flush_enabled() -> bool {
    ensure_init();
    FLUSH.load(Ordering::Relaxed)
}

pub fn set_flush_enabled(enabled: bool) {
    FLUSH.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level <= log_level()
}

/// Write `tag`, `args` and an optional newline as one unit.
#[doc(hidden)]
pub fn _emit(tag: &str, args: fmt::Arguments<'_>, newline: bool) {
    let entered = PRINTING
        .try_with(|p| !p.replace(true))
        .unwrap_or(false);
    if !entered {
        return;
    }

    let mut out = std::io::stderr().lock();
    let _ = out.write_all(tag.as_bytes());
    let _ = out.write_fmt(args);
    if newline {
        let _ = out.write_all(b"\n");
    }
    if flush_enabled() {
        let _ = out.flush();
    }
    drop(out);

    let _ = PRINTING.try_with(|p| p.set(false));
}

// ============================================================================
// Public Macros
// ============================================================================

/// Print to stderr (no newline), regardless of level
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {
        $crate::kprint::_emit("", format_args!($($arg)*), false)
    };
}

/// Print a line to stderr, regardless of level
#[macro_export]
macro_rules! kprintln {
    () => {
        $crate::kprint::_emit("", format_args!(""), true)
    };
    ($($arg:tt)*) => {
        $crate::kprint::_emit("", format_args!($($arg)*), true)
    };
}

/// Print a tagged line if `$level` is enabled. Arguments are not
/// evaluated otherwise.
#[macro_export]
macro_rules! klog {
    ($level:expr, $($arg:tt)*) => {{
        let level: $crate::kprint::LogLevel = $level;
        if $crate::kprint::level_enabled(level) {
            $crate::kprint::_emit(level.tag(), format_args!($($arg)*), true);
        }
    }};
}

#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Error, $($arg)*) };
}

#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Info, $($arg)*) };
}

#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Debug, $($arg)*) };
}

#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Trace, $($arg)*) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_level_order() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_level_from_u8_saturates() {
        assert_eq!(LogLevel::from_u8(0), LogLevel::Off);
        assert_eq!(LogLevel::from_u8(4), LogLevel::Debug);
        assert_eq!(LogLevel::from_u8(99), LogLevel::Trace);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("debug".parse(), Ok(LogLevel::Debug));
        assert_eq!(" WARN ".parse(), Ok(LogLevel::Warn));
        assert_eq!("3".parse(), Ok(LogLevel::Info));
        assert_eq!("9".parse::<LogLevel>(), Err(ParseLevelError));
        assert_eq!("loud".parse::<LogLevel>(), Err(ParseLevelError));
        assert_eq!(LogLevel::Trace.to_string(), "trace");
    }

    #[test]
    fn test_off_is_never_enabled() {
        assert!(!level_enabled(LogLevel::Off));
    }

    #[test]
    fn test_disabled_level_skips_arguments() {
        static EVALUATED: AtomicUsize = AtomicUsize::new(0);
        fn touch() -> usize {
            EVALUATED.fetch_add(1, Ordering::SeqCst)
        }
        // Trace is above the default and no test raises the level that far
        if !level_enabled(LogLevel::Trace) {
            ktrace!("{}", touch());
            assert_eq!(EVALUATED.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn test_nested_print_is_dropped() {
        PRINTING.with(|p| p.set(true));
        // Same thread already printing: return without writing
        kprintln!("dropped");
        assert!(PRINTING.with(|p| p.get()));
        PRINTING.with(|p| p.set(false));
        kprintln!();
        assert!(!PRINTING.with(|p| p.get()));
    }

    #[test]
    fn test_macros_compile() {
        kprint!("");
        kerror!("error {}", "msg");
        kwarn!("warn");
        kinfo!("info");
        kdebug!("debug");
        ktrace!("trace");
    }
}
