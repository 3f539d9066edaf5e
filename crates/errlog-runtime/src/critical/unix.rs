//! Signal masking for Unix

use nix::sys::signal::{pthread_sigmask, SigSet, SigmaskHow};

/// Blocks all maskable signals on the current thread until dropped.
pub(super) struct IrqMask {
    saved: Option<SigSet>,
}

impl IrqMask {
    #[inline]
    pub(super) fn acquire() -> Self {
        let mut saved = SigSet::empty();
        match pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&SigSet::all()), Some(&mut saved)) {
            Ok(()) => IrqMask { saved: Some(saved) },
            // Still safe against other threads via the spinlock
            Err(_) => IrqMask { saved: None },
        }
    }
}

impl Drop for IrqMask {
    #[inline]
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            let _ = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&saved), None);
        }
    }
}
