use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the runtime's file layer. Variants follow the errno
/// values the C surface reports; only the values the runtime and its
/// kernel implementations actually report are represented.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Errno::Acces: Permission denied
    #[error("Acces: Permission denied")]
    Acces,
    /// Errno::Badf: Bad file descriptor
    #[error("Badf: Bad file descriptor")]
    Badf,
    /// Errno::Exist: File exists
    #[error("Exist: File exists")]
    Exist,
    /// Errno::Inval: Invalid argument
    #[error("Inval: Invalid argument")]
    Inval,
    /// Errno::Io: I/O error
    #[error("Io: I/O error")]
    Io,
    /// Errno::Mfile: File descriptor value too large
    #[error("Mfile: Too many open files")]
    Mfile,
    /// Errno::Nametoolong: Filename too long
    #[error("Nametoolong: Filename too long")]
    Nametoolong,
    /// Errno::Noent: No such file or directory
    #[error("Noent: No such file or directory")]
    Noent,
}
