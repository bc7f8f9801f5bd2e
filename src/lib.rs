#![deny(trivial_numeric_casts, unused_extern_crates, unstable_features)]
#![warn(unused_import_braces)]

//! File-open layer of a minimal C runtime sitting atop a host kernel's
//! native file syscalls.
//!
//! The crate turns a caller-supplied (possibly relative, `.`/`..`-laden)
//! path string plus an open-flags bitmask into a normalized absolute path
//! and a committed record in a process-wide descriptor table, ready for
//! the byte-transfer calls bound into each handle. The kernel itself is
//! an external collaborator behind the [`Kernel`] trait; an in-memory
//! implementation lives in [`virtfs`] for embedders and tests.

mod ctx;
mod error;
mod fdpool;
pub mod file;
pub mod path;
mod sys;
mod table;
pub mod virtfs;

pub use ctx::IoCtx;
pub use error::{Error, Result};
pub use file::{FileEntry, FileMode, Filestat, OFlags};
pub use sys::Kernel;
pub use table::{DEFAULT_MAX_FDS, Fd, Table};
