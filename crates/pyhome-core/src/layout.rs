use std::path::{Path, PathBuf};

/// Directory under `bin` that holds application-provided modules.
pub const MODULES_DIR: &str = "python/modules";

/// Default link target for a runtime deployed beside an executable.
pub const INTERPRETER_DIR: &str = "python/interpreter";

/// File layout of an embedded runtime distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeLayout {
    /// `python.exe` at the home root.
    Windows,
    /// `bin/python3` under the home.
    Unix,
}

impl RuntimeLayout {
    /// Layout of the platform this binary was built for.
    pub fn host() -> Self {
        if cfg!(windows) {
            RuntimeLayout::Windows
        } else {
            RuntimeLayout::Unix
        }
    }

    /// Interpreter binary inside a runtime home.
    pub fn interpreter_path(self, home: &Path) -> PathBuf {
        match self {
            RuntimeLayout::Windows => home.join("python.exe"),
            RuntimeLayout::Unix => home.join("bin").join("python3"),
        }
    }

    /// Extra module directories beside the executable that exist on disk.
    pub fn module_dirs(self, bin: &Path) -> Vec<PathBuf> {
        let modules = bin.join(MODULES_DIR);
        if modules.is_dir() {
            vec![modules]
        } else {
            Vec::new()
        }
    }
}
