//! In-memory kernel. Enough of the host surface to run the runtime
//! without a real kernel under it; embedders use it the same way the
//! crate's own tests do.

use crate::file::Filestat;
use crate::sys::Kernel;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// HashMap-backed [`Kernel`]. Keys are the normalized absolute paths
/// the runtime produces; contents are plain byte vectors. A read-only
/// switch lets tests force creation and truncation failures.
pub struct InMemFs {
    files: Mutex<HashMap<String, Vec<u8>>>,
    cwd: String,
    read_only: AtomicBool,
}

impl InMemFs {
    pub fn new() -> Self {
        Self::with_cwd("/")
    }

    pub fn with_cwd(cwd: &str) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            cwd: cwd.to_owned(),
            read_only: AtomicBool::new(false),
        }
    }

    /// Seed a file with the given contents.
    pub fn insert_file(&self, path: &str, contents: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_owned(), contents.to_vec());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    /// When set, every mutating call fails with `Acces`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Relaxed);
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only.load(Ordering::Relaxed) {
            Err(Error::Acces)
        } else {
            Ok(())
        }
    }
}

impl Default for InMemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for InMemFs {
    fn filestat(&self, path: &str) -> Result<Filestat> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|data| Filestat {
                size: data.len() as u64,
            })
            .ok_or(Error::Noent)
    }

    fn create(&self, path: &str) -> Result<()> {
        self.check_writable()?;
        self.files
            .lock()
            .unwrap()
            .entry(path.to_owned())
            .or_default();
        Ok(())
    }

    fn set_size(&self, path: &str, size: u64) -> Result<()> {
        self.check_writable()?;
        let mut files = self.files.lock().unwrap();
        let data = files.get_mut(path).ok_or(Error::Noent)?;
        data.resize(size as usize, 0);
        Ok(())
    }

    fn getcwd(&self) -> Result<String> {
        Ok(self.cwd.clone())
    }

    fn read_at(&self, path: &str, buf: &mut [u8], offset: u64) -> Result<usize> {
        let files = self.files.lock().unwrap();
        let data = files.get(path).ok_or(Error::Noent)?;
        let offset = offset as usize;
        if offset >= data.len() {
            return Ok(0);
        }
        let nread = buf.len().min(data.len() - offset);
        buf[..nread].copy_from_slice(&data[offset..offset + nread]);
        Ok(nread)
    }

    fn write_at(&self, path: &str, buf: &[u8], offset: u64) -> Result<usize> {
        self.check_writable()?;
        let mut files = self.files.lock().unwrap();
        let data = files.get_mut(path).ok_or(Error::Noent)?;
        let offset = offset as usize;
        if data.len() < offset + buf.len() {
            data.resize(offset + buf.len(), 0);
        }
        data[offset..offset + buf.len()].copy_from_slice(buf);
        Ok(buf.len())
    }
}
