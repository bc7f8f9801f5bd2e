//! Open flags, resolved handle modes, and the per-descriptor record.

use crate::sys::Kernel;
use crate::{Error, Result};
use bitflags::bitflags;
use std::io::SeekFrom;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

bitflags! {
    /// Caller-facing open flags. The access-mode group is explicit:
    /// `READ`, `WRITE`, or `READ | WRITE` for read-write. `EXCLUSIVE`
    /// is only consulted together with `CREATE`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct OFlags: u32 {
        const READ      = 0b1;
        const WRITE     = 0b10;
        const CREATE    = 0b100;
        const EXCLUSIVE = 0b1000;
        const TRUNCATE  = 0b10000;
        const APPEND    = 0b100000;
        const BINARY    = 0b1000000;
        const TEXT      = 0b10000000;
    }
}

bitflags! {
    /// Mode bits resolved at open time and fixed for the handle's
    /// lifetime. `BINARY` is the default transfer mode when the caller
    /// requests neither `BINARY` nor `TEXT`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct FileMode: u32 {
        const READ   = 0b1;
        const WRITE  = 0b10;
        const APPEND = 0b100;
        const BINARY = 0b1000;
    }
}

/// File metadata as reported by the kernel's existence probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filestat {
    pub size: u64,
}

/// One committed descriptor record.
///
/// The byte-transfer collaborator is bound once, at commit time, and
/// stays fixed for the life of the handle. The offset is the only
/// mutable field.
pub struct FileEntry {
    name: String,
    offset: AtomicU64,
    mode: FileMode,
    io: Arc<dyn Kernel>,
}

impl FileEntry {
    pub(crate) fn new(name: String, offset: u64, mode: FileMode, io: Arc<dyn Kernel>) -> Self {
        Self {
            name,
            offset: AtomicU64::new(offset),
            mode,
            io,
        }
    }

    /// The normalized absolute path this handle was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Current byte cursor.
    pub fn offset(&self) -> u64 {
        self.offset.load(Ordering::Relaxed)
    }

    pub(crate) fn read(&self, buf: &mut [u8]) -> Result<usize> {
        if !self.mode.contains(FileMode::READ) {
            return Err(Error::Badf);
        }
        let offset = self.offset.load(Ordering::Relaxed);
        let nread = self.io.read_at(&self.name, buf, offset)?;
        self.offset.store(offset + nread as u64, Ordering::Relaxed);
        Ok(nread)
    }

    pub(crate) fn write(&self, buf: &[u8]) -> Result<usize> {
        if !self.mode.contains(FileMode::WRITE) {
            return Err(Error::Badf);
        }
        // Append-mode handles position every write at the current end
        // of file, not at the stored cursor.
        let offset = if self.mode.contains(FileMode::APPEND) {
            self.io.filestat(&self.name)?.size
        } else {
            self.offset.load(Ordering::Relaxed)
        };
        let nwritten = self.io.write_at(&self.name, buf, offset)?;
        self.offset.store(offset + nwritten as u64, Ordering::Relaxed);
        Ok(nwritten)
    }

    pub(crate) fn seek(&self, pos: SeekFrom) -> Result<u64> {
        let next = match pos {
            SeekFrom::Start(offset) => {
                self.offset.store(offset, Ordering::Relaxed);
                return Ok(offset);
            }
            SeekFrom::Current(delta) => self.offset.load(Ordering::Relaxed) as i64 + delta,
            SeekFrom::End(delta) => self.io.filestat(&self.name)?.size as i64 + delta,
        };
        if next < 0 {
            return Err(Error::Inval);
        }
        let next = next as u64;
        self.offset.store(next, Ordering::Relaxed);
        Ok(next)
    }
}
