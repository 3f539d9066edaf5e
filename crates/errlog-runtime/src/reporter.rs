//! Error reporter
//!
//! The public logging API. A reporter owns the error registry (first and
//! last error, error count), the history ring, the hook slot and the halt
//! handler.
//!
//! ```text
//! log_warning / log_fatal
//!        │
//!        ▼
//!  ┌─────────────────────── critical section ───────────────────────┐
//!  │ sequence = next  │ first ??= rec │ last = rec │ count++ │ ring.push │
//!  └─────────────────────────────────────────────────────────────────┘
//!        │
//!        ▼
//!     hook(rec) ──► (fatal) report ──► halt handler (never returns)
//! ```
//!
//! The critical section is short and allocation-free, so logging is safe
//! from signal handlers. The hook runs after it is released.
//!
//! `new()` is `const`; a reporter is normally a `static`.

use core::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};

use errlog_core::error::{ErrlogError, ErrlogResult};
use errlog_core::record::{next_sequence, ErrorRecord};
#[cfg(feature = "history")]
use errlog_core::ring::HistoryRing;
use errlog_core::status::Status;
use errlog_core::kinfo;

use crate::config::defaults::{FATAL_REPORT, FILENAME_CAPTURE, HIST_SIZE};
use crate::config::ReporterConfig;
use crate::critical::CriticalSection;
use crate::halt::{abort_handler, print_report, HaltHandler};
use crate::hook::{ErrorHook, HookDispatcher};
use crate::thread::current_thread_id;

/// Error context registry. Everything here changes together.
struct Registry<const N: usize> {
    last: Option<ErrorRecord>,
    /// Latched on the first record of an era.
    first: Option<ErrorRecord>,
    count: u32,
    #[cfg(feature = "history")]
    history: HistoryRing<N>,
}

impl<const N: usize> Registry<N> {
    const fn new() -> Self {
        Registry {
            last: None,
            first: None,
            count: 0,
            #[cfg(feature = "history")]
            history: HistoryRing::new(),
        }
    }

    fn record(&mut self, record: ErrorRecord) {
        if self.first.is_none() {
            self.first = Some(record);
        }
        self.last = Some(record);
        self.count = self.count.saturating_add(1);
        #[cfg(feature = "history")]
        self.history.push(record);
    }

    fn clear(&mut self) {
        self.last = None;
        self.first = None;
        self.count = 0;
        #[cfg(feature = "history")]
        self.history.clear();
    }
}

/// Error log with a history ring of `N` records.
pub struct ErrorReporter<const N: usize = HIST_SIZE> {
    registry: CriticalSection<Registry<N>>,
    hook: HookDispatcher,
    halt: CriticalSection<HaltHandler>,
    fatal_in_progress: AtomicBool,
    capture_location: AtomicBool,
    fatal_report: AtomicBool,
}

impl<const N: usize> ErrorReporter<N> {
    /// History capacity.
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        ErrorReporter {
            registry: CriticalSection::new(Registry::new()),
            hook: HookDispatcher::new(),
            halt: CriticalSection::new(abort_handler),
            fatal_in_progress: AtomicBool::new(false),
            capture_location: AtomicBool::new(FILENAME_CAPTURE),
            fatal_report: AtomicBool::new(FATAL_REPORT),
        }
    }

    /// Apply runtime settings. The history path is the caller's business.
    pub fn configure(&self, config: &ReporterConfig) {
        self.capture_location.store(config.capture_location, Ordering::Relaxed);
        self.fatal_report.store(config.fatal_report, Ordering::Relaxed);
    }

    // ── Logging ──

    /// Record a warning and return the status as stored.
    ///
    /// Never halts. Non-error values are normalized first, and a FATAL bit
    /// on the input is dropped.
    #[track_caller]
    pub fn log_warning(&self, status: Status, message: &'static str, value: usize) -> Status {
        let status = status.normalize().without_fatal();
        let record = self.store(status, message, value);
        self.hook.invoke(&record);
        status
    }

    /// Record a fatal error, run the hook, print the report and halt.
    ///
    /// A fatal error raised while another one is being handled (from the
    /// hook, from another thread, from a signal handler) is not recorded
    /// and skips the hook.
    #[track_caller]
    pub fn log_fatal(&self, status: Status, message: &'static str, value: usize) -> ! {
        let status = status.normalize().with_fatal();

        if self.fatal_in_progress.swap(true, Ordering::AcqRel) {
            let record = self.make_record(status, message, value, next_sequence());
            self.halt(&record)
        }

        let record = self.store(status, message, value);
        self.hook.invoke(&record);
        if self.fatal_report.load(Ordering::Relaxed) {
            print_report(&record);
        }
        self.halt(&record)
    }

    #[track_caller]
    fn store(&self, status: Status, message: &'static str, value: usize) -> ErrorRecord {
        let mut registry = self.registry.enter();
        // Sequence is taken inside the section so ring order matches it.
        let record = self.make_record(status, message, value, next_sequence());
        registry.record(record);
        record
    }

    #[track_caller]
    #[inline]
    fn make_record(&self, status: Status, message: &'static str, value: usize, sequence: u64) -> ErrorRecord {
        let location = if self.capture_location.load(Ordering::Relaxed) {
            Some(Location::caller())
        } else {
            None
        };
        ErrorRecord {
            status,
            value,
            thread_id: current_thread_id(),
            location,
            message,
            sequence,
        }
    }

    fn halt(&self, record: &ErrorRecord) -> ! {
        let handler = *self.halt.enter();
        handler(record)
    }

    // ── Registry queries ──

    /// Start a new era: forget first/last error, the count and the history.
    ///
    /// Also re-arms the fatal path, for halt handlers that return control
    /// by unwinding. Does not print, like the rest of the logging path.
    pub fn clear_all(&self) {
        self.registry.with(|r| r.clear());
        self.fatal_in_progress.store(false, Ordering::Release);
    }

    pub fn first_error(&self) -> ErrlogResult<ErrorRecord> {
        self.registry.with(|r| r.first).ok_or(ErrlogError::NotFound)
    }

    pub fn last_error(&self) -> ErrlogResult<ErrorRecord> {
        self.registry.with(|r| r.last).ok_or(ErrlogError::NotFound)
    }

    /// Errors logged since the last clear, including those evicted from the ring.
    pub fn error_count(&self) -> u32 {
        self.registry.with(|r| r.count)
    }

    pub fn is_fatal_in_progress(&self) -> bool {
        self.fatal_in_progress.load(Ordering::Acquire)
    }

    // ── History ──

    /// The `index`-th oldest record still in the ring.
    #[cfg(feature = "history")]
    pub fn history_entry(&self, index: usize) -> ErrlogResult<ErrorRecord> {
        self.registry.with(|r| {
            r.history.get(index).copied().ok_or(ErrlogError::OutOfRange {
                index,
                len: r.history.len(),
            })
        })
    }

    #[cfg(feature = "history")]
    pub fn history_len(&self) -> usize {
        self.registry.with(|r| r.history.len())
    }

    /// Consistent copy of the ring, for iteration outside the critical section.
    #[cfg(feature = "history")]
    pub fn history_snapshot(&self) -> HistoryRing<N> {
        self.registry.with(|r| r.history.clone())
    }

    // ── Hook and halt handler ──

    /// Register the error hook, returning the previous one.
    pub fn set_hook(&self, hook: ErrorHook) -> ErrlogResult<Option<ErrorHook>> {
        let prev = self.hook.set_hook(hook)?;
        kinfo!("error hook registered");
        Ok(prev)
    }

    pub fn clear_hook(&self) -> Option<ErrorHook> {
        self.hook.clear_hook()
    }

    /// Replace the halt handler, returning the previous one.
    pub fn set_halt_handler(&self, handler: HaltHandler) -> HaltHandler {
        core::mem::replace(&mut *self.halt.enter(), handler)
    }
}

impl<const N: usize> Default for ErrorReporter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for ErrorReporter<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (count, last) = self.registry.with(|r| (r.count, r.last.map(|rec| rec.status)));
        f.debug_struct("ErrorReporter")
            .field("capacity", &N)
            .field("count", &count)
            .field("last", &last)
            .field("fatal_in_progress", &self.is_fatal_in_progress())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errlog_core::status::{self, ErrorCode, Module};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::thread;

    fn quiet<const N: usize>() -> ErrorReporter<N> {
        let r = ErrorReporter::new();
        r.configure(&ReporterConfig::new().fatal_report(false));
        r.set_halt_handler(panic_halt);
        r
    }

    fn panic_halt(record: &ErrorRecord) -> ! {
        panic!("halted on #{}", record.sequence)
    }

    #[test]
    fn test_empty_reporter() {
        let r: ErrorReporter<4> = ErrorReporter::new();
        assert_eq!(r.first_error(), Err(ErrlogError::NotFound));
        assert_eq!(r.last_error(), Err(ErrlogError::NotFound));
        assert_eq!(r.error_count(), 0);
        assert!(!r.is_fatal_in_progress());
    }

    #[test]
    fn test_first_and_last() {
        let r: ErrorReporter<4> = quiet();
        r.clear_all();
        let app = Status::system(Module::APPLICATION, ErrorCode::INVALID_ARGUMENT);
        let plat = Status::system(Module::PLATFORM, ErrorCode::TIME_OUT);
        r.log_warning(app, "first", 0x1234);
        r.log_warning(plat, "second", 0xABCD);

        let first = r.first_error().unwrap();
        assert_eq!(first.value, 0x1234);
        assert_eq!(first.status.module(), Module::APPLICATION);
        let last = r.last_error().unwrap();
        assert_eq!(last.value, 0xABCD);
        assert_eq!(last.status.module(), Module::PLATFORM);

        // first stays latched, last follows
        r.log_warning(status::TIME_OUT, "third", 3);
        assert_eq!(r.first_error().unwrap().value, 0x1234);
        assert_eq!(r.last_error().unwrap().value, 3);
        assert_eq!(r.error_count(), 3);
    }

    #[test]
    fn test_clear_all_starts_new_era() {
        let r: ErrorReporter<4> = quiet();
        r.log_warning(status::TIME_OUT, "", 1);
        r.log_warning(status::TIME_OUT, "", 2);
        r.clear_all();
        assert_eq!(r.first_error(), Err(ErrlogError::NotFound));
        assert_eq!(r.last_error(), Err(ErrlogError::NotFound));
        assert_eq!(r.error_count(), 0);

        r.log_warning(status::TIME_OUT, "", 3);
        assert_eq!(r.first_error().unwrap().value, 3);
    }

    #[test]
    fn test_warning_returns_normalized_status() {
        let r: ErrorReporter<4> = quiet();
        let s = r.log_warning(Status::from_raw(ErrorCode::TIME_OUT.as_u16() as u32), "bare", 0);
        assert_eq!(s, status::TIME_OUT);
        assert_eq!(r.last_error().unwrap().status, status::TIME_OUT);

        let s = r.log_warning(status::ACCESS_DENIED.with_fatal(), "not fatal", 0);
        assert!(!s.is_fatal());
        assert!(!r.last_error().unwrap().is_fatal());
    }

    #[test]
    fn test_location_capture() {
        let r: ErrorReporter<4> = quiet();
        r.configure(&ReporterConfig::new().capture_location(true));
        r.log_warning(status::TIME_OUT, "here", 0);
        let loc = r.last_error().unwrap().location.unwrap();
        assert!(loc.file().ends_with("reporter.rs"));

        r.configure(&ReporterConfig::new().capture_location(false));
        r.log_warning(status::TIME_OUT, "nowhere", 0);
        assert!(r.last_error().unwrap().location.is_none());
    }

    #[test]
    fn test_record_fields() {
        let r: ErrorReporter<4> = quiet();
        r.log_warning(status::ALREADY_IN_USE, "busy", 42);
        let rec = r.last_error().unwrap();
        assert_eq!(rec.message, "busy");
        assert_eq!(rec.value, 42);
        assert_eq!(rec.thread_id, current_thread_id());
        assert!(rec.sequence > 0);
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_history_in_order_below_capacity() {
        let r: ErrorReporter<4> = quiet();
        for v in 1..=3 {
            r.log_warning(status::TIME_OUT, "", v);
        }
        assert_eq!(r.history_len(), 3);
        for i in 0..3 {
            assert_eq!(r.history_entry(i).unwrap().value, i + 1);
        }
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_history_keeps_most_recent() {
        let r: ErrorReporter<4> = quiet();
        for v in 1..=5 {
            r.log_warning(status::TIME_OUT, "", v);
        }
        let values: Vec<usize> = (0..4).map(|i| r.history_entry(i).unwrap().value).collect();
        assert_eq!(values, vec![2, 3, 4, 5]);
        assert_eq!(r.error_count(), 5);
        // first error is not subject to eviction
        assert_eq!(r.first_error().unwrap().value, 1);
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_history_out_of_range() {
        let r: ErrorReporter<4> = quiet();
        for size in 0..=4 {
            r.clear_all();
            for v in 0..size {
                r.log_warning(status::TIME_OUT, "", v);
            }
            assert_eq!(
                r.history_entry(size),
                Err(ErrlogError::OutOfRange { index: size, len: size })
            );
        }
        assert!(r.history_entry(usize::MAX).is_err());
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_zero_capacity() {
        let r: ErrorReporter<0> = quiet();
        r.log_warning(status::TIME_OUT, "", 9);
        assert_eq!(r.history_len(), 0);
        assert_eq!(r.history_entry(0), Err(ErrlogError::OutOfRange { index: 0, len: 0 }));
        assert_eq!(r.last_error().unwrap().value, 9);
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_snapshot_is_a_copy() {
        let r: ErrorReporter<4> = quiet();
        r.log_warning(status::TIME_OUT, "", 1);
        let snap = r.history_snapshot();
        r.log_warning(status::TIME_OUT, "", 2);
        assert_eq!(snap.len(), 1);
        assert_eq!(r.history_len(), 2);
    }

    #[test]
    fn test_concurrent_logging() {
        let r: Arc<ErrorReporter<8>> = Arc::new(quiet());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let r = Arc::clone(&r);
                thread::spawn(move || {
                    for i in 0..250 {
                        r.log_warning(status::TIME_OUT, "", t * 1000 + i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(r.error_count(), 1000);

        #[cfg(feature = "history")]
        {
            let snap = r.history_snapshot();
            assert_eq!(snap.len(), 8);
            let seqs: Vec<u64> = snap.iter().map(|rec| rec.sequence).collect();
            assert!(seqs.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(r.last_error().unwrap().sequence, *seqs.last().unwrap());
        }
    }

    #[test]
    fn test_fatal_records_and_halts() {
        let r: ErrorReporter<4> = quiet();
        let s = Status::system(Module::DRIVER_I2C, ErrorCode::OPERATION_PROHIBITED);
        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            r.log_fatal(s, "bus stuck", 0xDEAD);
        }));
        assert!(caught.is_err());
        assert!(r.is_fatal_in_progress());

        let last = r.last_error().unwrap();
        assert!(last.is_fatal());
        assert_eq!(last.status.without_fatal(), s);
        assert_eq!(last.value, 0xDEAD);
    }

    #[test]
    fn test_nested_fatal_is_not_recorded() {
        let r: ErrorReporter<4> = quiet();
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            r.log_fatal(status::FAILED_OPERATION, "first", 1);
        }));
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            r.log_fatal(status::FAILED_OPERATION, "second", 2);
        }));
        assert_eq!(r.error_count(), 1);
        assert_eq!(r.last_error().unwrap().value, 1);

        // clear re-arms
        r.clear_all();
        assert!(!r.is_fatal_in_progress());
    }

    #[test]
    fn test_set_halt_handler_returns_previous() {
        fn other(_: &ErrorRecord) -> ! {
            panic!("other")
        }
        let r: ErrorReporter<4> = ErrorReporter::new();
        let prev = r.set_halt_handler(other);
        assert_eq!(prev as usize, abort_handler as usize);
    }

    #[test]
    fn test_clear_all_does_not_wait_for_stderr() {
        use errlog_core::kprint::{set_log_level, LogLevel};
        use std::io::Write;
        use std::sync::mpsc;
        use std::time::{Duration, Instant};

        let prev = set_log_level(LogLevel::Trace);
        let r: ErrorReporter<4> = quiet();
        r.log_warning(status::TIME_OUT, "before clear", 1);

        let (locked_tx, locked_rx) = mpsc::channel();
        let holder = thread::spawn(move || {
            let mut err = std::io::stderr().lock();
            locked_tx.send(()).unwrap();
            thread::sleep(Duration::from_millis(400));
            let _ = err.flush();
        });
        locked_rx.recv().unwrap();

        let start = Instant::now();
        r.clear_all();
        let elapsed = start.elapsed();

        holder.join().unwrap();
        set_log_level(prev);

        assert!(elapsed < Duration::from_millis(200), "clear_all took {:?}", elapsed);
        assert_eq!(r.error_count(), 0);
    }

    #[cfg(unix)]
    mod signal_context {
        use super::*;
        use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

        static SIG_REPORTER: ErrorReporter<4> = ErrorReporter::new();

        extern "C" fn on_sigusr2(_: libc::c_int) {
            SIG_REPORTER.log_warning(status::TIME_OUT, "from handler", 0x99);
        }

        #[test]
        fn test_handler_logging_waits_for_critical_section() {
            let action = SigAction::new(
                SigHandler::Handler(on_sigusr2),
                SaFlags::empty(),
                SigSet::empty(),
            );
            let old = unsafe { signal::sigaction(Signal::SIGUSR2, &action) }.unwrap();

            SIG_REPORTER.log_warning(status::TIME_OUT, "before", 1);
            // Raised while the registry is held: the handler must not run
            // until the section is left, or it would spin on its own lock.
            let inside = SIG_REPORTER.registry.with(|r| {
                signal::raise(Signal::SIGUSR2).unwrap();
                r.count
            });
            assert_eq!(inside, 1);

            assert_eq!(SIG_REPORTER.error_count(), 2);
            let last = SIG_REPORTER.last_error().unwrap();
            assert_eq!(last.value, 0x99);
            assert_eq!(last.message, "from handler");
            assert_eq!(SIG_REPORTER.first_error().unwrap().value, 1);

            unsafe { signal::sigaction(Signal::SIGUSR2, &old) }.unwrap();
        }
    }

    #[cfg(feature = "hook")]
    mod hook {
        use super::*;
        use crate::sync::{Semaphore, WaitSignal};
        use std::sync::atomic::AtomicUsize;
        use std::time::Duration;

        static DELIVERED: Semaphore = Semaphore::new(0);
        static SEEN_VALUE: AtomicUsize = AtomicUsize::new(0);
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        fn signalling_hook(record: &ErrorRecord) {
            SEEN_VALUE.store(record.value, Ordering::SeqCst);
            DELIVERED.signal();
        }

        fn counting_hook(_: &ErrorRecord) {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }

        #[test]
        fn test_hook_invoked_once_with_record() {
            let r: ErrorReporter<4> = quiet();
            assert!(r.set_hook(signalling_hook).unwrap().is_none());
            r.log_warning(status::TIME_OUT, "hooked", 0x5A5A);

            assert!(DELIVERED.wait(Some(Duration::from_secs(1))));
            assert_eq!(SEEN_VALUE.load(Ordering::SeqCst), 0x5A5A);
            // exactly once
            assert!(!DELIVERED.wait(Some(Duration::from_millis(20))));
        }

        #[test]
        fn test_second_fatal_skips_hook() {
            let r: ErrorReporter<4> = quiet();
            r.set_hook(counting_hook).unwrap();
            let _ = panic::catch_unwind(AssertUnwindSafe(|| {
                r.log_fatal(status::TIME_OUT, "one", 1);
            }));
            assert_eq!(CALLS.load(Ordering::SeqCst), 1);
            let _ = panic::catch_unwind(AssertUnwindSafe(|| {
                r.log_fatal(status::TIME_OUT, "two", 2);
            }));
            assert_eq!(CALLS.load(Ordering::SeqCst), 1);
            assert!(r.clear_hook().is_some());
        }
    }
}
