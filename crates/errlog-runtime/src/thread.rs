//! Identifier of the reporting thread, recorded in every error record.

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        /// Kernel thread id (`gettid`). Async-signal-safe.
        #[inline]
        pub fn current_thread_id() -> u64 {
            // Safety: gettid takes no arguments and cannot fail
            unsafe { libc::syscall(libc::SYS_gettid) as u64 }
        }
    } else if #[cfg(unix)] {
        /// `pthread_self` handle; unique among live threads.
        #[inline]
        pub fn current_thread_id() -> u64 {
            // Safety: pthread_self is always callable
            unsafe { libc::pthread_self() as usize as u64 }
        }
    } else {
        use std::sync::atomic::{AtomicU64, Ordering};

        static NEXT_ID: AtomicU64 = AtomicU64::new(1);

        std::thread_local! {
            static THREAD_ID: u64 = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        }

        #[inline]
        pub fn current_thread_id() -> u64 {
            THREAD_ID.try_with(|id| *id).unwrap_or(0)
        }
    }
}
