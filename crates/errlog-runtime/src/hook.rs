//! Single-slot error hook
//!
//! At most one hook is registered per reporter. It runs synchronously, on
//! the thread (or in the signal handler) that logged the error, right after
//! the registry critical section is released. Hooks must therefore not
//! block, must not allocate, and must not log through the same reporter.
//!
//! A panicking hook is caught and reported; the logging path carries on.

use std::panic::{self, AssertUnwindSafe};

use errlog_core::error::ErrlogResult;
use errlog_core::record::ErrorRecord;
use errlog_core::kwarn;

use crate::critical::CriticalSection;

/// Hook signature. A plain `fn` so registration transfers no ownership.
pub type ErrorHook = fn(&ErrorRecord);

pub struct HookDispatcher {
    slot: CriticalSection<Option<ErrorHook>>,
}

impl HookDispatcher {
    pub const fn new() -> Self {
        HookDispatcher {
            slot: CriticalSection::new(None),
        }
    }

    /// Register `hook`, returning the one it replaces.
    ///
    /// Fails with `Unsupported` when built without the `hook` feature.
    pub fn set_hook(&self, hook: ErrorHook) -> ErrlogResult<Option<ErrorHook>> {
        #[cfg(feature = "hook")]
        {
            Ok(self.slot.with(|slot| slot.replace(hook)))
        }
        #[cfg(not(feature = "hook"))]
        {
            let _ = hook;
            Err(errlog_core::error::ErrlogError::Unsupported)
        }
    }

    /// Unregister, returning the previous hook.
    pub fn clear_hook(&self) -> Option<ErrorHook> {
        self.slot.with(|slot| slot.take())
    }

    pub fn current(&self) -> Option<ErrorHook> {
        self.slot.with(|slot| *slot)
    }

    /// Call the registered hook, if any. Returns whether a hook ran to completion.
    pub fn invoke(&self, record: &ErrorRecord) -> bool {
        let Some(hook) = self.current() else {
            return false;
        };
        match panic::catch_unwind(AssertUnwindSafe(|| hook(record))) {
            Ok(()) => true,
            Err(_) => {
                kwarn!("error hook panicked on record #{} ({})", record.sequence, record.status);
                false
            }
        }
    }
}

impl Default for HookDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "hook"))]
mod tests {
    use super::*;
    use errlog_core::record::next_sequence;
    use errlog_core::status;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    fn rec(value: usize) -> ErrorRecord {
        ErrorRecord {
            status: status::INVALID_ARGUMENT,
            value,
            thread_id: 1,
            location: None,
            message: "hook test",
            sequence: next_sequence(),
        }
    }

    // One hook per test: tests run in parallel and share these statics.
    static CALLS_A: AtomicUsize = AtomicUsize::new(0);
    fn hook_a(_: &ErrorRecord) {
        CALLS_A.fetch_add(1, Ordering::SeqCst);
    }

    static CALLS_B: AtomicUsize = AtomicUsize::new(0);
    fn hook_b(_: &ErrorRecord) {
        CALLS_B.fetch_add(1, Ordering::SeqCst);
    }

    static LAST_VALUE_C: AtomicU64 = AtomicU64::new(0);
    fn hook_c(r: &ErrorRecord) {
        LAST_VALUE_C.store(r.value as u64, Ordering::SeqCst);
    }

    fn hook_panics(_: &ErrorRecord) {
        panic!("misbehaving hook");
    }

    #[test]
    fn test_no_hook_is_noop() {
        let d = HookDispatcher::new();
        assert!(d.current().is_none());
        assert!(!d.invoke(&rec(1)));
    }

    #[test]
    fn test_set_replaces_and_returns_previous() {
        let d = HookDispatcher::new();
        assert!(d.set_hook(hook_a).unwrap().is_none());
        let prev = d.set_hook(hook_b).unwrap();
        assert!(prev.is_some());

        let before_a = CALLS_A.load(Ordering::SeqCst);
        let before_b = CALLS_B.load(Ordering::SeqCst);
        assert!(d.invoke(&rec(1234)));
        assert_eq!(CALLS_A.load(Ordering::SeqCst), before_a);
        assert_eq!(CALLS_B.load(Ordering::SeqCst), before_b + 1);
    }

    #[test]
    fn test_invoke_passes_record() {
        let d = HookDispatcher::new();
        d.set_hook(hook_c).unwrap();
        assert!(d.invoke(&rec(0xBEEF)));
        assert_eq!(LAST_VALUE_C.load(Ordering::SeqCst), 0xBEEF);
        assert!(d.clear_hook().is_some());
        assert!(!d.invoke(&rec(1)));
    }

    #[test]
    fn test_panicking_hook_is_contained() {
        let d = HookDispatcher::new();
        d.set_hook(hook_panics).unwrap();
        assert!(!d.invoke(&rec(7)));
        // Still usable afterwards
        assert!(!d.invoke(&rec(8)));
        assert!(d.current().is_some());
    }
}
