//! Storage capability
//!
//! The minimal block-filesystem surface the history persister needs. A
//! real target would implement [`FileSystem`] over its flash driver;
//! [`HeapFileSystem`] is an in-memory volume for hosts and tests.

mod heap;

pub use heap::HeapFileSystem;

use std::fmt;

/// How a file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Existing file, read from the start.
    Read,
    /// Create if missing, truncate if present.
    Write,
}

/// Open file, as issued by [`FileSystem::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(pub(crate) u32);

impl FileHandle {
    #[inline]
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Storage failure, with enough detail to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Volume carries no filesystem (or a damaged one)
    Corrupt,
    NotMounted,
    AlreadyMounted,
    /// Operation needs the volume unmounted
    Busy,
    /// Path is not on this volume, or names a directory
    InvalidPath(String),
    NotFound(String),
    /// Handle is closed or was never issued
    BadHandle(u32),
    /// Handle was opened in the other mode
    WrongMode(u32),
    /// Volume is full
    NoSpace { needed: usize, free: usize },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Corrupt => write!(f, "no valid filesystem on volume"),
            StorageError::NotMounted => write!(f, "volume not mounted"),
            StorageError::AlreadyMounted => write!(f, "volume already mounted"),
            StorageError::Busy => write!(f, "volume busy"),
            StorageError::InvalidPath(p) => write!(f, "invalid path: {}", p),
            StorageError::NotFound(p) => write!(f, "no such file: {}", p),
            StorageError::BadHandle(h) => write!(f, "bad file handle {}", h),
            StorageError::WrongMode(h) => write!(f, "file handle {} opened in another mode", h),
            StorageError::NoSpace { needed, free } => {
                write!(f, "no space left ({} bytes needed, {} free)", needed, free)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// A mountable volume holding flat files.
///
/// Paths are absolute: `/<mount name>/<file>`.
pub trait FileSystem {
    /// Erase the volume and write an empty filesystem. Leaves it unmounted.
    fn format(&mut self) -> Result<(), StorageError>;

    fn mount(&mut self) -> Result<(), StorageError>;

    /// Unmount, closing any open files.
    fn unmount(&mut self) -> Result<(), StorageError>;

    fn is_mounted(&self) -> bool;

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<FileHandle, StorageError>;

    /// Read up to `buf.len()` bytes; `Ok(0)` at end of file.
    fn read(&mut self, handle: FileHandle, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Append `buf`, returning the bytes written.
    fn write(&mut self, handle: FileHandle, buf: &[u8]) -> Result<usize, StorageError>;

    fn close(&mut self, handle: FileHandle) -> Result<(), StorageError>;
}
