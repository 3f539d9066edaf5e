//! Interrupt-safe critical section
//!
//! On an MCU the registry would be guarded by masking interrupts. The
//! hosted equivalent of an interrupt is a signal delivered to the same
//! thread, so entering a critical section first blocks every signal on the
//! calling thread and then takes a [`SpinLock`]. A signal handler that logs
//! an error therefore can never spin on a lock its own thread already holds.
//!
//! ```text
//! enter():  mask signals ──► spin lock ──► ... ──► unlock ──► restore mask
//! ```
//!
//! Nothing here blocks in the OS sense or allocates.

use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

use errlog_core::spinlock::{SpinLock, SpinLockGuard};

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix;
        use unix::IrqMask;
    } else {
        mod fallback;
        use fallback::IrqMask;
    }
}

/// Data that is only touched with "interrupts" masked.
pub struct CriticalSection<T> {
    lock: SpinLock<T>,
}

impl<T> CriticalSection<T> {
    pub const fn new(value: T) -> Self {
        CriticalSection {
            lock: SpinLock::new(value),
        }
    }

    /// Mask signals, then lock. Both are undone when the guard drops.
    #[inline]
    pub fn enter(&self) -> CriticalGuard<'_, T> {
        let mask = IrqMask::acquire();
        let guard = self.lock.lock();
        CriticalGuard {
            guard,
            _mask: mask,
            _not_send: PhantomData,
        }
    }

    /// Run `f` inside the critical section.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.enter();
        f(&mut guard)
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.lock.get_mut()
    }
}

impl<T: Default> Default for CriticalSection<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Held critical section.
///
/// Field order matters: the spinlock guard drops before the mask is restored.
pub struct CriticalGuard<'a, T> {
    guard: SpinLockGuard<'a, T>,
    _mask: IrqMask,
    // The saved mask belongs to the thread that entered.
    _not_send: PhantomData<*const ()>,
}

impl<'a, T> Deref for CriticalGuard<'a, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<'a, T> DerefMut for CriticalGuard<'a, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_with_mutates() {
        let cs = CriticalSection::new(0u32);
        cs.with(|v| *v += 5);
        assert_eq!(*cs.enter(), 5);
    }

    #[test]
    fn test_reentry_after_release() {
        let cs = CriticalSection::new(Vec::<u32>::new());
        for i in 0..3 {
            cs.enter().push(i);
        }
        assert_eq!(*cs.enter(), vec![0, 1, 2]);
    }

    #[test]
    fn test_concurrent_enter() {
        let cs = Arc::new(CriticalSection::new(0u64));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cs = Arc::clone(&cs);
                thread::spawn(move || {
                    for _ in 0..500 {
                        cs.with(|v| *v += 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*cs.enter(), 2000);
    }
}
