//! Library error type.

use std::io;
use std::path::PathBuf;

/// Everything a unit, the scanner or the settings loader can fail with.
///
/// Absence of a backup target is deliberately not represented here: it is a
/// [`BackupResult::NotFound`](crate::result::BackupResult::NotFound), not an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The external program ran and exited with a non-zero status.
    #[error("{program} failed: {stderr}")]
    CommandFailed { program: String, stderr: String },

    /// The external program could not be started at all.
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error("cannot determine absolute path to user's home directory")]
    NoWayHome,

    #[error("invalid configuration file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// Attach the offending path to an I/O error.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
