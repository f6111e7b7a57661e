//! Error types for mesh file reading and writing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing or loading a mesh file pair.
#[derive(Error, Debug)]
pub enum MeshFileError {
    /// A file could not be opened, read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The declaration or the binary blob does not hold what it should.
    #[error("{}: {message}", path.display())]
    Format { path: PathBuf, message: String },
}

impl MeshFileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path of the file the error is about
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Format { path, .. } => path,
        }
    }
}
