//! # errlog-core
//!
//! Core types for the errlog error history.
//!
//! This crate is platform-agnostic: no signal masks, no thread ids, no
//! storage. Those live in `errlog-runtime`.
//!
//! ## Modules
//!
//! - `status` - Bit-packed status codes (type, module, code, fatal flag)
//! - `record` - The `ErrorRecord` value type and the sequence counter
//! - `ring` - Fixed-capacity history ring (feature `history`)
//! - `spinlock` - Non-blocking lock for the registry
//! - `error` - Error types
//! - `kprint` - Kernel-style leveled stderr macros
//! - `env` - Environment variable utilities

pub mod status;
pub mod record;
#[cfg(feature = "history")]
pub mod ring;
pub mod spinlock;
pub mod error;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use status::{ErrorCode, ErrorType, Module, Status, SUCCESS};
pub use record::{next_sequence, ErrorRecord, Severity};
#[cfg(feature = "history")]
pub use ring::HistoryRing;
pub use spinlock::{SpinLock, SpinLockGuard};
pub use error::{ErrlogError, ErrlogResult};
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str};
