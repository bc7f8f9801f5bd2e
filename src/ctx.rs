//! The runtime I/O context: descriptor table plus kernel, and the
//! open/close/read/write/seek calls that go through it.

use crate::file::{FileEntry, FileMode, OFlags};
use crate::path;
use crate::sys::Kernel;
use crate::table::{DEFAULT_MAX_FDS, Fd, Table};
use crate::{Error, Result};
use std::io::SeekFrom;
use std::sync::Arc;

/// One `IoCtx` per process. All file calls are synchronous; the
/// context can be shared across threads, and the table serializes its
/// own mutations internally.
pub struct IoCtx {
    kernel: Arc<dyn Kernel>,
    table: Table,
}

impl IoCtx {
    pub fn new(kernel: Arc<dyn Kernel>) -> Self {
        Self::with_max_fds(kernel, DEFAULT_MAX_FDS)
    }

    pub fn with_max_fds(kernel: Arc<dyn Kernel>, max_fds: u32) -> Self {
        Self {
            kernel,
            table: Table::new(max_fds),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Open `path` with `flags` and return the descriptor ID.
    ///
    /// The slot is reserved up front and either committed with the
    /// finished record or released on the way out of any failure, so a
    /// failed open never leaks table capacity.
    pub fn open(&self, path: &str, flags: OFlags) -> Result<Fd> {
        let fd = self.table.reserve()?;
        match self.prepare(path, flags) {
            Ok(entry) => {
                self.table.commit(fd, Arc::new(entry));
                log::debug!("open {:?} {:?} -> fd {}", path, flags, fd);
                Ok(fd)
            }
            Err(err) => {
                self.table.release(fd);
                log::debug!("open {:?} {:?} failed: {}", path, flags, err);
                Err(err)
            }
        }
    }

    /// Everything fallible between the slot reservation and the
    /// commit: path resolution, the existence probe, creation,
    /// truncation, and mode resolution.
    fn prepare(&self, path: &str, flags: OFlags) -> Result<FileEntry> {
        let name = self.resolve(path)?;
        log::trace!("resolved {:?} -> {:?}", path, name);

        let stat = self.kernel.filestat(&name);

        if flags.contains(OFlags::CREATE | OFlags::EXCLUSIVE) && stat.is_ok() {
            return Err(Error::Exist);
        }

        let size = match stat {
            Ok(stat) => stat.size,
            Err(_) => {
                if !flags.contains(OFlags::CREATE) {
                    return Err(Error::Acces);
                }
                self.kernel.create(&name).map_err(|_| Error::Acces)?;
                0
            }
        };

        let size = if flags.contains(OFlags::TRUNCATE) {
            self.kernel.set_size(&name, 0)?;
            0
        } else {
            size
        };

        let mut mode = FileMode::empty();
        if flags.contains(OFlags::READ) {
            mode |= FileMode::READ;
        }
        if flags.contains(OFlags::WRITE) {
            mode |= FileMode::WRITE;
        }

        let mut offset = 0;
        if flags.contains(OFlags::APPEND) {
            mode |= FileMode::APPEND;
            offset = size;
        }

        if flags.contains(OFlags::BINARY) || !flags.contains(OFlags::TEXT) {
            mode |= FileMode::BINARY;
        }

        Ok(FileEntry::new(name, offset, mode, Arc::clone(&self.kernel)))
    }

    /// Resolve a raw path to canonical absolute form: absolute inputs
    /// normalize from the root, relative inputs normalize onto the
    /// kernel's working directory.
    fn resolve(&self, path: &str) -> Result<String> {
        let mut buf = if path.starts_with('/') {
            String::from("/")
        } else {
            let cwd = path::fold_separators(&self.kernel.getcwd()?);
            if cwd.len() > path::PATH_MAX {
                return Err(Error::Nametoolong);
            }
            cwd
        };
        path::normalize_onto(&mut buf, path)?;
        Ok(buf)
    }

    /// Release the descriptor. The ID becomes eligible for reuse.
    pub fn close(&self, fd: Fd) -> Result<()> {
        let entry = self.table.remove(fd)?;
        log::debug!("close fd {} ({:?})", fd, entry.name());
        Ok(())
    }

    /// Read at the handle's cursor, advancing it by the bytes
    /// transferred.
    pub fn read(&self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        self.table.get(fd)?.read(buf)
    }

    /// Write at the handle's cursor (or at end of file for append
    /// handles), advancing the cursor past the written bytes.
    pub fn write(&self, fd: Fd, buf: &[u8]) -> Result<usize> {
        self.table.get(fd)?.write(buf)
    }

    /// Reposition the handle's cursor. Seeking before the start of the
    /// file fails with `Inval`.
    pub fn seek(&self, fd: Fd, pos: SeekFrom) -> Result<u64> {
        self.table.get(fd)?.seek(pos)
    }
}
