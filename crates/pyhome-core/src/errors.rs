use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while resolving the embedded runtime home.
#[derive(Debug, Error)]
pub enum HomeError {
    /// No co-located runtime directory and no marker file beside the executable.
    #[error("runtime home not found beside {}", bin.display())]
    HomeNotFound {
        /// Directory that was searched.
        bin: PathBuf,
    },
    /// Executable path has no containing directory.
    #[error("executable path has no parent directory: {}", path.display())]
    NoParent { path: PathBuf },
    /// Marker file exists but could not be read.
    #[error("failed to read marker {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Marker file contents are not valid UTF-8.
    #[error("marker {} is not valid utf-8", path.display())]
    InvalidUtf8 { path: PathBuf },
    /// Marker file holds no path.
    #[error("marker {} is empty", path.display())]
    EmptyMarker { path: PathBuf },
}

/// Failures while laying out a runtime beside an executable.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Link source does not exist.
    #[error("runtime source does not exist: {}", path.display())]
    MissingSource { path: PathBuf },
}

impl DeployError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
