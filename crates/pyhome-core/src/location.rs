use std::{
    env, fs, io,
    path::{self, Path, PathBuf},
};

use crate::HomeError;

/// Absolute path of the running executable, captured once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLocation {
    exe: PathBuf,
}

impl ProgramLocation {
    /// Captures the location of the current process.
    pub fn current() -> io::Result<Self> {
        Ok(Self::canonical(env::current_exe()?))
    }

    /// Wraps an executable path, canonicalizing it when it exists and
    /// otherwise making it absolute against the current directory.
    pub fn canonical(exe: impl Into<PathBuf>) -> Self {
        let exe = exe.into();
        match fs::canonicalize(&exe) {
            Ok(resolved) => Self { exe: resolved },
            Err(_) => match path::absolute(&exe) {
                Ok(absolute) => Self { exe: absolute },
                Err(_) => Self { exe },
            },
        }
    }

    /// Wraps an executable path as given.
    pub fn from_path(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    /// Directory containing the executable.
    pub fn bin_dir(&self) -> Result<&Path, HomeError> {
        match self.exe.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent),
            _ => Err(HomeError::NoParent {
                path: self.exe.clone(),
            }),
        }
    }
}
