//! Counting semaphore
//!
//! A blocking-wait primitive for code that must wait on something an error
//! hook (or another thread) signals. Never used on the logging path itself.
//! Platform-specific implementations use the cheapest primitive available.

use std::time::Duration;

/// Counting wait/signal pair.
pub trait WaitSignal: Send + Sync {
    /// Release one permit, waking one waiter if any is blocked.
    fn signal(&self);

    /// Take one permit, blocking until one is available or `timeout`
    /// elapses (`None` waits forever).
    ///
    /// Returns:
    /// - `true` if a permit was taken
    /// - `false` on timeout
    fn wait(&self, timeout: Option<Duration>) -> bool;

    /// Permits currently available (hint, may be stale)
    fn available(&self) -> u32;
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod futex_linux;
        pub use futex_linux::FutexSemaphore as Semaphore;
    } else {
        mod fallback;
        pub use fallback::CondvarSemaphore as Semaphore;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_wait_timeout() {
        let sem = Semaphore::new(0);
        let start = Instant::now();
        assert!(!sem.wait(Some(Duration::from_millis(50))));
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_initial_permits() {
        let sem = Semaphore::new(2);
        assert_eq!(sem.available(), 2);
        assert!(sem.wait(Some(Duration::ZERO)));
        assert!(sem.wait(Some(Duration::ZERO)));
        assert!(!sem.wait(Some(Duration::ZERO)));
    }

    #[test]
    fn test_signal_before_wait_is_kept() {
        let sem = Semaphore::new(0);
        sem.signal();
        assert_eq!(sem.available(), 1);
        assert!(sem.wait(Some(Duration::from_millis(10))));
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn test_signal_wakes_waiter() {
        let sem = Arc::new(Semaphore::new(0));
        let sem2 = Arc::clone(&sem);

        let handle = thread::spawn(move || sem2.wait(Some(Duration::from_secs(10))));

        thread::sleep(Duration::from_millis(50));
        sem.signal();

        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_many_signals_many_waiters() {
        let sem = Arc::new(Semaphore::new(0));
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let sem = Arc::clone(&sem);
                thread::spawn(move || sem.wait(Some(Duration::from_secs(10))))
            })
            .collect();
        for _ in 0..4 {
            sem.signal();
        }
        for w in waiters {
            assert!(w.join().unwrap());
        }
        assert_eq!(sem.available(), 0);
    }
}
