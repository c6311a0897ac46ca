use std::{
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use pyhome_core::{HOME_ENV, ResolvedHome, RuntimeLayout};
use thiserror::Error;

/// Brings up an embedded runtime rooted at a resolved home.
pub trait RuntimeInitializer {
    /// Initializes the runtime, consuming the home it was resolved with.
    fn initialize(&self, home: ResolvedHome) -> Result<RuntimeInfo, RuntimeError>;
}

/// Facts reported by an initialized runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// Home the runtime was initialized with.
    pub home: PathBuf,
    /// Runtime version string.
    pub version: String,
}

/// Errors emitted by runtime initializers.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Home does not contain the expected interpreter.
    #[error("interpreter not found: {}", path.display())]
    InterpreterMissing { path: PathBuf },
    /// Interpreter could not be started.
    #[error("failed to start {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Interpreter started but rejected its home.
    #[error("interpreter exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

const VERSION_SCRIPT: &str = "import sys; sys.stdout.write(sys.version)";

/// Initializes the runtime by launching its own interpreter in isolated mode.
#[derive(Debug, Clone, Copy)]
pub struct InterpreterProcess {
    layout: RuntimeLayout,
}

impl InterpreterProcess {
    pub fn new(layout: RuntimeLayout) -> Self {
        Self { layout }
    }

    pub fn interpreter(&self, home: &Path) -> PathBuf {
        self.layout.interpreter_path(home)
    }
}

impl Default for InterpreterProcess {
    fn default() -> Self {
        Self::new(RuntimeLayout::host())
    }
}

impl RuntimeInitializer for InterpreterProcess {
    fn initialize(&self, home: ResolvedHome) -> Result<RuntimeInfo, RuntimeError> {
        let home = home.into_path_buf();
        let interpreter = self.interpreter(&home);
        if !interpreter.is_file() {
            return Err(RuntimeError::InterpreterMissing { path: interpreter });
        }

        tracing::debug!(interpreter = %interpreter.display(), "starting runtime");
        let output = Command::new(&interpreter)
            .env(HOME_ENV, &home)
            .args(["-I", "-c", VERSION_SCRIPT])
            .output()
            .map_err(|source| RuntimeError::Spawn {
                path: interpreter.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RuntimeError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::info!(home = %home.display(), version = %version, "runtime initialized");
        Ok(RuntimeInfo { home, version })
    }
}
