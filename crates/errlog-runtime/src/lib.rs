//! # errlog-runtime
//!
//! Platform-specific runtime for the errlog error history.
//!
//! This crate provides:
//! - Signal-masking critical section (the hosted stand-in for masking IRQs)
//! - The error reporter: registry, history ring, hook, fatal halt path
//! - History persistence to a block filesystem
//! - A reference in-memory filesystem volume
//! - A counting semaphore for code that waits on error hooks

pub mod config;
pub mod critical;
pub mod halt;
pub mod hook;
#[cfg(feature = "history")]
pub mod persist;
pub mod reporter;
pub mod storage;
pub mod sync;
pub mod thread;

// Re-exports
pub use config::ReporterConfig;
pub use critical::CriticalSection;
pub use halt::HaltHandler;
pub use hook::ErrorHook;
#[cfg(feature = "history")]
pub use persist::{read_history, save_history, PersistedRecord};
pub use reporter::ErrorReporter;
pub use storage::{FileSystem, HeapFileSystem, OpenMode, StorageError};
pub use sync::{Semaphore, WaitSignal};
pub use thread::current_thread_id;
