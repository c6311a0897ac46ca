use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{HomeError, ProgramLocation, ResolverConfig};

/// Strategy that produced a resolved home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HomeSource {
    /// Explicit override, typically `PYTHONHOME`.
    Override,
    /// Runtime directory beside the executable.
    Colocated,
    /// Contents of a marker file beside the executable.
    Marker {
        /// Marker file that was read.
        file: PathBuf,
    },
}

/// Home directory handed to the runtime initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHome {
    path: PathBuf,
    source: HomeSource,
}

impl ResolvedHome {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &HomeSource {
        &self.source
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }

    /// Serializable summary for reporting.
    pub fn report(&self, bin: &Path) -> HomeReport {
        HomeReport {
            bin: bin.to_string_lossy().to_string(),
            home: self.path.to_string_lossy().to_string(),
            source: self.source.clone(),
        }
    }
}

/// Resolution outcome in a form suitable for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeReport {
    /// Directory containing the executable.
    pub bin: String,
    /// Resolved runtime home.
    pub home: String,
    /// Strategy that produced the home.
    pub source: HomeSource,
}

/// Finds the runtime home for an executable.
///
/// Candidates are tried in a fixed order: the configured override, then each
/// co-located directory beside the executable, then each marker file. The
/// first hit wins. When nothing matches, resolution fails with
/// [`HomeError::HomeNotFound`] instead of yielding an empty path.
#[derive(Debug, Clone, Default)]
pub struct HomeResolver {
    config: ResolverConfig,
}

impl HomeResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn resolve(&self, location: &ProgramLocation) -> Result<ResolvedHome, HomeError> {
        self.resolve_in(location.bin_dir()?)
    }

    /// Resolves against an already known executable directory.
    pub fn resolve_in(&self, bin: &Path) -> Result<ResolvedHome, HomeError> {
        if let Some(home) = &self.config.home_override {
            tracing::debug!(home = %home.display(), "using home override");
            return Ok(ResolvedHome {
                path: home.clone(),
                source: HomeSource::Override,
            });
        }

        for candidate in self.config.colocated_candidates(bin) {
            if is_dir(&candidate) {
                tracing::debug!(home = %candidate.display(), "found co-located runtime");
                return Ok(ResolvedHome {
                    path: candidate,
                    source: HomeSource::Colocated,
                });
            }
            tracing::debug!(candidate = %candidate.display(), "no co-located runtime");
        }

        for marker in self.config.marker_candidates(bin) {
            if !marker_exists(&marker)? {
                tracing::debug!(marker = %marker.display(), "marker not present");
                continue;
            }
            let contents = self.read_marker(&marker)?;
            tracing::debug!(marker = %marker.display(), home = %contents, "read home from marker");
            return Ok(ResolvedHome {
                path: PathBuf::from(contents),
                source: HomeSource::Marker { file: marker },
            });
        }

        Err(HomeError::HomeNotFound {
            bin: bin.to_path_buf(),
        })
    }

    fn read_marker(&self, marker: &Path) -> Result<String, HomeError> {
        let bytes = fs::read(marker).map_err(|source| HomeError::Io {
            path: marker.to_path_buf(),
            source,
        })?;
        let contents = String::from_utf8(bytes).map_err(|_| HomeError::InvalidUtf8 {
            path: marker.to_path_buf(),
        })?;
        let contents = self.config.marker_contents.apply(contents);
        if contents.is_empty() {
            return Err(HomeError::EmptyMarker {
                path: marker.to_path_buf(),
            });
        }
        Ok(contents)
    }
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|metadata| metadata.is_dir())
}

fn marker_exists(path: &Path) -> Result<bool, HomeError> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(HomeError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
