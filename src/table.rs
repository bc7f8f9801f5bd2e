//! The process-wide descriptor table.

use crate::fdpool::FdPool;
use crate::file::FileEntry;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Descriptor IDs are small non-negative integers, reused only after
/// an explicit release.
pub type Fd = u32;

/// Default cap on simultaneously open descriptors.
pub const DEFAULT_MAX_FDS: u32 = 64;

/// Maps descriptor IDs to committed [`FileEntry`] records.
///
/// A slot goes through reserve → commit, or reserve → release when the
/// open that reserved it fails partway; a reserved-but-uncommitted
/// slot never outlives its open call. The lock is held only across
/// each individual table mutation, never across kernel round-trips.
pub struct Table(RwLock<Inner>);

struct Inner {
    pool: FdPool,
    entries: HashMap<Fd, Arc<FileEntry>>,
}

impl Table {
    /// Create an empty table capped at `max_fds` live descriptors.
    pub fn new(max_fds: u32) -> Self {
        Self(RwLock::new(Inner {
            pool: FdPool::new(max_fds),
            entries: HashMap::new(),
        }))
    }

    /// Reserve a descriptor ID. The ID is held out of circulation but
    /// has no entry yet; it must be either committed or released.
    pub(crate) fn reserve(&self) -> Result<Fd> {
        self.0.write().unwrap().pool.allocate().ok_or(Error::Mfile)
    }

    /// Commit the finished record under a reserved ID.
    pub(crate) fn commit(&self, fd: Fd, entry: Arc<FileEntry>) {
        let old = self.0.write().unwrap().entries.insert(fd, entry);
        debug_assert!(old.is_none());
    }

    /// Return a reserved-but-uncommitted ID to the pool.
    pub(crate) fn release(&self, fd: Fd) {
        let mut inner = self.0.write().unwrap();
        debug_assert!(!inner.entries.contains_key(&fd));
        inner.pool.deallocate(fd);
    }

    /// Get the committed entry for `fd`.
    pub fn get(&self, fd: Fd) -> Result<Arc<FileEntry>> {
        self.0
            .read()
            .unwrap()
            .entries
            .get(&fd)
            .cloned()
            .ok_or(Error::Badf)
    }

    /// Remove the committed entry for `fd` and free its slot.
    pub(crate) fn remove(&self, fd: Fd) -> Result<Arc<FileEntry>> {
        let mut inner = self.0.write().unwrap();
        let entry = inner.entries.remove(&fd).ok_or(Error::Badf)?;
        inner.pool.deallocate(fd);
        Ok(entry)
    }

    /// Number of committed entries.
    pub fn len(&self) -> usize {
        self.0.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
