//! Linux futex-based semaphore
//!
//! The futex word is the permit count itself:
//! - `wait` decrements it with a CAS when non-zero, otherwise sleeps in
//!   FUTEX_WAIT while the word is still 0
//! - `signal` increments it and wakes one sleeper

use super::WaitSignal;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

pub struct FutexSemaphore {
    /// Available permits; also the futex word
    count: AtomicU32,
}

impl FutexSemaphore {
    pub const fn new(permits: u32) -> Self {
        Self {
            count: AtomicU32::new(permits),
        }
    }

    fn try_take(&self) -> bool {
        let mut current = self.count.load(Ordering::Acquire);
        while current > 0 {
            match self.count.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
        false
    }

    fn futex_wait(&self, timeout: Option<Duration>) {
        let timespec = timeout.map(|d| libc::timespec {
            tv_sec: d.as_secs() as libc::time_t,
            tv_nsec: d.subsec_nanos() as libc::c_long,
        });
        let timespec_ptr = match &timespec {
            Some(ts) => ts as *const libc::timespec,
            None => std::ptr::null(),
        };

        // Sleep only while no permit is available. ETIMEDOUT, EAGAIN and
        // EINTR all send the caller back round its loop.
        unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.count.as_ptr(),
                libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
                0u32,
                timespec_ptr,
                std::ptr::null::<u32>(),
                0u32,
            );
        }
    }
}

impl Default for FutexSemaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl WaitSignal for FutexSemaphore {
    fn signal(&self) {
        self.count.fetch_add(1, Ordering::Release);
        unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.count.as_ptr(),
                libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
                1i32,
                std::ptr::null::<libc::timespec>(),
                std::ptr::null::<u32>(),
                0u32,
            );
        }
    }

    fn wait(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if self.try_take() {
                return true;
            }
            let remaining = match deadline {
                Some(d) => {
                    let now = Instant::now();
                    if now >= d {
                        return false;
                    }
                    Some(d - now)
                }
                None => None,
            };
            self.futex_wait(remaining);
        }
    }

    fn available(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}
