//! In-memory block volume
//!
//! A fixed number of fixed-size blocks, like a RAM-backed block device
//! with a flat filesystem on top. Block 0 holds the superblock; every file
//! occupies at least one data block. A fresh volume is unformatted and
//! refuses to mount until [`FileSystem::format`] has run.

use std::collections::{BTreeMap, HashMap};

use errlog_core::ktrace;

use super::{FileHandle, FileSystem, OpenMode, StorageError};

pub const DEFAULT_BLOCK_SIZE: usize = 512;
pub const DEFAULT_BLOCK_COUNT: usize = 8;

struct OpenFile {
    name: String,
    mode: OpenMode,
    pos: usize,
}

pub struct HeapFileSystem {
    name: String,
    block_size: usize,
    block_count: usize,
    formatted: bool,
    mounted: bool,
    files: BTreeMap<String, Vec<u8>>,
    open: HashMap<u32, OpenFile>,
    next_handle: u32,
}

impl HeapFileSystem {
    /// Default geometry: 8 blocks of 512 bytes.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_geometry(name, DEFAULT_BLOCK_COUNT, DEFAULT_BLOCK_SIZE)
    }

    /// `block_count` includes the superblock, so at least 2 are needed to
    /// store anything.
    pub fn with_geometry(name: impl Into<String>, block_count: usize, block_size: usize) -> Self {
        HeapFileSystem {
            name: name.into(),
            block_size: block_size.max(1),
            block_count,
            formatted: false,
            mounted: false,
            files: BTreeMap::new(),
            open: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Mount name; files live under `/<name>/`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Data blocks in use.
    pub fn used_blocks(&self) -> usize {
        self.files.values().map(|f| self.blocks_for(f.len())).sum()
    }

    /// Size of a file, if it exists and the volume is mounted.
    pub fn file_len(&self, path: &str) -> Option<usize> {
        if !self.mounted {
            return None;
        }
        let file = self.file_name(path).ok()?;
        self.files.get(file).map(Vec::len)
    }

    fn data_blocks(&self) -> usize {
        self.block_count.saturating_sub(1)
    }

    fn blocks_for(&self, len: usize) -> usize {
        len.div_ceil(self.block_size).max(1)
    }

    fn free_blocks(&self) -> usize {
        self.data_blocks().saturating_sub(self.used_blocks())
    }

    /// `/<name>/<file>` to `<file>`.
    fn file_name<'p>(&self, path: &'p str) -> Result<&'p str, StorageError> {
        let invalid = || StorageError::InvalidPath(path.to_string());
        let rest = path.strip_prefix('/').ok_or_else(invalid)?;
        let (mount, file) = rest.split_once('/').ok_or_else(invalid)?;
        if mount != self.name || file.is_empty() || file.contains('/') {
            return Err(invalid());
        }
        Ok(file)
    }

    fn check_mounted(&self) -> Result<(), StorageError> {
        if self.mounted {
            Ok(())
        } else {
            Err(StorageError::NotMounted)
        }
    }

    fn open_file(&mut self, handle: FileHandle, mode: OpenMode) -> Result<&mut OpenFile, StorageError> {
        let file = self.open.get_mut(&handle.0).ok_or(StorageError::BadHandle(handle.0))?;
        if file.mode != mode {
            return Err(StorageError::WrongMode(handle.0));
        }
        Ok(file)
    }
}

impl FileSystem for HeapFileSystem {
    fn format(&mut self) -> Result<(), StorageError> {
        if self.mounted {
            return Err(StorageError::Busy);
        }
        if self.block_count < 2 {
            return Err(StorageError::NoSpace {
                needed: 2 * self.block_size,
                free: self.block_count * self.block_size,
            });
        }
        self.files.clear();
        self.formatted = true;
        ktrace!("heap volume '{}' formatted ({} x {} bytes)", self.name, self.block_count, self.block_size);
        Ok(())
    }

    fn mount(&mut self) -> Result<(), StorageError> {
        if self.mounted {
            return Err(StorageError::AlreadyMounted);
        }
        if !self.formatted {
            return Err(StorageError::Corrupt);
        }
        self.mounted = true;
        ktrace!("heap volume '{}' mounted", self.name);
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), StorageError> {
        self.check_mounted()?;
        self.open.clear();
        self.mounted = false;
        ktrace!("heap volume '{}' unmounted", self.name);
        Ok(())
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<FileHandle, StorageError> {
        self.check_mounted()?;
        let name = self.file_name(path)?.to_string();
        match mode {
            OpenMode::Read => {
                if !self.files.contains_key(&name) {
                    return Err(StorageError::NotFound(path.to_string()));
                }
            }
            OpenMode::Write => {
                if !self.files.contains_key(&name) && self.free_blocks() == 0 {
                    return Err(StorageError::NoSpace {
                        needed: self.block_size,
                        free: 0,
                    });
                }
                self.files.entry(name.clone()).or_default().clear();
            }
        }

        let handle = FileHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        ktrace!("open {} ({:?}) -> handle {}", path, mode, handle.0);
        self.open.insert(handle.0, OpenFile { name, mode, pos: 0 });
        Ok(handle)
    }

    fn read(&mut self, handle: FileHandle, buf: &mut [u8]) -> Result<usize, StorageError> {
        self.check_mounted()?;
        let (name, pos) = {
            let file = self.open_file(handle, OpenMode::Read)?;
            (file.name.clone(), file.pos)
        };
        let data = self
            .files
            .get(&name)
            .ok_or_else(|| StorageError::NotFound(name.clone()))?;
        let start = pos.min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.open_file(handle, OpenMode::Read)?.pos = start + n;
        Ok(n)
    }

    fn write(&mut self, handle: FileHandle, buf: &[u8]) -> Result<usize, StorageError> {
        self.check_mounted()?;
        let name = self.open_file(handle, OpenMode::Write)?.name.clone();
        let old_len = self.files.get(&name).map_or(0, Vec::len);
        let new_len = old_len + buf.len();

        let extra = self.blocks_for(new_len) - self.blocks_for(old_len);
        let free = self.free_blocks();
        if extra > free {
            return Err(StorageError::NoSpace {
                needed: buf.len(),
                free: free * self.block_size + (self.blocks_for(old_len) * self.block_size - old_len),
            });
        }

        self.files.entry(name).or_default().extend_from_slice(buf);
        self.open_file(handle, OpenMode::Write)?.pos = new_len;
        Ok(buf.len())
    }

    fn close(&mut self, handle: FileHandle) -> Result<(), StorageError> {
        self.check_mounted()?;
        self.open
            .remove(&handle.0)
            .map(|_| ())
            .ok_or(StorageError::BadHandle(handle.0))
    }
}

impl std::fmt::Debug for HeapFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapFileSystem")
            .field("name", &self.name)
            .field("blocks", &format_args!("{}/{}", self.used_blocks(), self.data_blocks()))
            .field("block_size", &self.block_size)
            .field("mounted", &self.mounted)
            .field("files", &self.files.len())
            .finish()
    }
}
