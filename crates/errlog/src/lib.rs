//! # errlog - error history for embedded-style runtimes
//!
//! A fixed-capacity ring of structured error records with first/last-error
//! latches, a synchronous hook, a fatal halt path and persistence to a
//! block filesystem.
//!
//! ## Quick Start
//!
//! ```ignore
//! use errlog::{status, warning, fatal, Module, ErrorCode, Status};
//!
//! fn main() {
//!     errlog::init().expect("bad errlog config");
//!
//!     // Log a warning and carry on
//!     warning!(status::TIME_OUT, "sensor did not answer", 0x40);
//!
//!     // Look back
//!     let last = errlog::last_error().unwrap();
//!     println!("{:?}", last);
//!
//!     // Flush the history to flash
//!     let mut fs = errlog::HeapFileSystem::new("fs");
//!     errlog::save_history(&mut fs).unwrap();
//!
//!     // Unrecoverable: record, report, halt
//!     fatal!(Status::system(Module::DRIVER_I2C, ErrorCode::NO_RESPONSE), "bus dead");
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      User Code                              │
//! │          warning!(), fatal!(), last_error(), hooks          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ErrorReporter                            │
//! │   critical section: registry + history ring (signal-safe)   │
//! └─────────────────────────────────────────────────────────────┘
//!          │                   │                   │
//!          ▼                   ▼                   ▼
//!    ┌───────────┐      ┌───────────┐      ┌───────────┐
//!    │   Hook    │      │   Halt    │      │ Persister │
//!    │ (sync cb) │      │ (fatal)   │      │ (to fs)   │
//!    └───────────┘      └───────────┘      └───────────┘
//! ```
//!
//! The free functions and macros here all go through one process-wide
//! [`ErrorReporter`]. Build a reporter of your own when you need several
//! independent logs.

use std::sync::OnceLock;

// Re-export core types
pub use errlog_core::{
    status,
    ErrorCode,
    ErrorType,
    Module,
    Status,
    SUCCESS,
    ErrorRecord,
    Severity,
    ErrlogError,
    ErrlogResult,
};
#[cfg(feature = "history")]
pub use errlog_core::HistoryRing;

// Re-export kprint macros for diagnostics
pub use errlog_core::{kprint, kprintln, klog, kerror, kwarn, kinfo, kdebug, ktrace};
pub use errlog_core::kprint::{LogLevel, init as init_logging, set_log_level, set_flush_enabled};

// Re-export env utilities
pub use errlog_core::{env_get, env_get_bool, env_get_opt, env_get_str};

// Re-export runtime types
pub use errlog_runtime::{
    ReporterConfig,
    ErrorReporter,
    ErrorHook,
    HaltHandler,
    FileSystem,
    HeapFileSystem,
    OpenMode,
    StorageError,
    Semaphore,
    WaitSignal,
    current_thread_id,
};
pub use errlog_runtime::config::ConfigError;
pub use errlog_runtime::config::defaults::HIST_SIZE;
#[cfg(feature = "history")]
pub use errlog_runtime::{read_history, PersistedRecord};

/// The process-wide reporter behind the free functions and macros.
static REPORTER: ErrorReporter = ErrorReporter::new();

static CONFIG: OnceLock<ReporterConfig> = OnceLock::new();

/// The process-wide reporter.
#[inline]
pub fn global() -> &'static ErrorReporter {
    &REPORTER
}

/// Read logging and reporter settings from the environment and apply them.
///
/// Only the first call to this or [`config`] reads the environment. Logging
/// works without it, using compile-time defaults.
pub fn init() -> Result<&'static ReporterConfig, ConfigError> {
    init_logging();
    let config = config();
    config.validate()?;
    REPORTER.configure(config);
    kdebug!("errlog initialized, history capacity {}", HIST_SIZE);
    Ok(config)
}

/// Settings in effect, read from the environment on first use.
///
/// Calling this before [`init`] reads the same settings `init` would; it
/// does not apply them to the reporter.
pub fn config() -> &'static ReporterConfig {
    settings(&CONFIG)
}

fn settings(cell: &OnceLock<ReporterConfig>) -> &ReporterConfig {
    cell.get_or_init(ReporterConfig::from_env)
}

// ── Logging ──

/// Log a warning on the global reporter. Returns the status as recorded.
#[track_caller]
#[inline]
pub fn warning(status: Status, message: &'static str, value: usize) -> Status {
    REPORTER.log_warning(status, message, value)
}

/// Log a fatal error on the global reporter and halt.
#[track_caller]
#[inline]
pub fn fatal(status: Status, message: &'static str, value: usize) -> ! {
    REPORTER.log_fatal(status, message, value)
}

/// Log a warning at the call site.
///
/// ```ignore
/// warning!(status::TIME_OUT, "no reply");
/// warning!(status::TIME_OUT, "no reply", addr);
/// ```
#[macro_export]
macro_rules! warning {
    ($status:expr, $msg:expr) => {
        $crate::warning($status, $msg, 0)
    };
    ($status:expr, $msg:expr, $value:expr) => {
        $crate::warning($status, $msg, ($value) as usize)
    };
}

/// Log a fatal error at the call site and halt.
#[macro_export]
macro_rules! fatal {
    ($status:expr, $msg:expr) => {
        $crate::fatal($status, $msg, 0)
    };
    ($status:expr, $msg:expr, $value:expr) => {
        $crate::fatal($status, $msg, ($value) as usize)
    };
}

// ── Queries ──

pub fn clear_all() {
    REPORTER.clear_all()
}

pub fn first_error() -> ErrlogResult<ErrorRecord> {
    REPORTER.first_error()
}

pub fn last_error() -> ErrlogResult<ErrorRecord> {
    REPORTER.last_error()
}

pub fn error_count() -> u32 {
    REPORTER.error_count()
}

#[cfg(feature = "history")]
pub fn history_entry(index: usize) -> ErrlogResult<ErrorRecord> {
    REPORTER.history_entry(index)
}

#[cfg(feature = "history")]
pub fn history_len() -> usize {
    REPORTER.history_len()
}

// ── Hook and halt ──

pub fn set_hook(hook: ErrorHook) -> ErrlogResult<Option<ErrorHook>> {
    REPORTER.set_hook(hook)
}

pub fn clear_hook() -> Option<ErrorHook> {
    REPORTER.clear_hook()
}

pub fn set_halt_handler(handler: HaltHandler) -> HaltHandler {
    REPORTER.set_halt_handler(handler)
}

// ── Persistence ──

/// Save the global history to the configured path (`ERRLOG_HISTORY_PATH`).
#[cfg(feature = "history")]
pub fn save_history<F: FileSystem + ?Sized>(fs: &mut F) -> ErrlogResult<()> {
    errlog_runtime::save_history(&REPORTER, fs, &config().history_path)
}
