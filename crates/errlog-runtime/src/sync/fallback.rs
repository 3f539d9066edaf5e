//! Semaphore on `std::sync::Condvar`
//!
//! Used on platforms without futex support.

use super::WaitSignal;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub struct CondvarSemaphore {
    count: Mutex<u32>,
    condvar: Condvar,
}

impl CondvarSemaphore {
    pub const fn new(permits: u32) -> Self {
        Self {
            count: Mutex::new(permits),
            condvar: Condvar::new(),
        }
    }

    // A panicking waiter cannot leave the count inconsistent.
    fn lock(&self) -> MutexGuard<'_, u32> {
        self.count.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for CondvarSemaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl WaitSignal for CondvarSemaphore {
    fn signal(&self) {
        *self.lock() += 1;
        self.condvar.notify_one();
    }

    fn wait(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut count = self.lock();
        while *count == 0 {
            count = match deadline {
                Some(d) => {
                    let now = Instant::now();
                    if now >= d {
                        return false;
                    }
                    match self.condvar.wait_timeout(count, d - now) {
                        Ok((g, _)) => g,
                        Err(e) => e.into_inner().0,
                    }
                }
                None => self.condvar.wait(count).unwrap_or_else(|e| e.into_inner()),
            };
        }
        *count -= 1;
        true
    }

    fn available(&self) -> u32 {
        *self.lock()
    }
}
