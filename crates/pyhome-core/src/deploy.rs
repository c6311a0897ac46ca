use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::DeployError;

/// How a runtime ended up at its link destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMethod {
    Symlink,
    /// Symlinks were unavailable so the tree was copied.
    Copy,
}

/// Makes the runtime at `src` available at `dst` without copying it when possible.
///
/// Anything already at `dst` is removed first, including broken symlinks left
/// behind by an earlier deployment. The link always targets the absolute
/// source path so a relative `src` stays valid from the link's directory.
pub fn link_runtime(src: &Path, dst: &Path) -> Result<LinkMethod, DeployError> {
    let src = match fs::canonicalize(src) {
        Ok(resolved) => resolved,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(DeployError::MissingSource {
                path: src.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(DeployError::Io {
                path: src.to_path_buf(),
                source,
            });
        }
    };

    if let Some(parent) = dst.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(DeployError::io(parent))?;
    }

    clear_destination(dst)?;

    match symlink_dir(&src, dst) {
        Ok(()) => {
            tracing::info!(src = %src.display(), dst = %dst.display(), "linked runtime");
            Ok(LinkMethod::Symlink)
        }
        Err(err) if cfg!(windows) => {
            tracing::warn!(error = %err, "symlink failed, copying runtime instead");
            copy_tree(&src, dst)?;
            Ok(LinkMethod::Copy)
        }
        Err(err) => Err(DeployError::Io {
            path: dst.to_path_buf(),
            source: err,
        }),
    }
}

/// Copies the runtime's shared libraries and archives next to the executable.
///
/// Sub-paths are not preserved. Returns the destination of each copied file.
pub fn copy_shared_libraries(src: &Path, bin: &Path) -> Result<Vec<PathBuf>, DeployError> {
    fs::create_dir_all(bin).map_err(DeployError::io(bin))?;

    let mut copied = Vec::new();
    copy_matching(src, bin, is_root_library, &mut copied)?;
    copy_matching(&src.join("lib"), bin, is_lib_library, &mut copied)?;
    Ok(copied)
}

/// Writes a marker file whose entire contents is `home`.
pub fn write_marker(bin: &Path, marker: &str, home: &str) -> Result<PathBuf, DeployError> {
    fs::create_dir_all(bin).map_err(DeployError::io(bin))?;
    let path = bin.join(marker);
    fs::write(&path, home).map_err(DeployError::io(&path))?;
    tracing::info!(marker = %path.display(), home, "wrote home marker");
    Ok(path)
}

fn clear_destination(dst: &Path) -> Result<(), DeployError> {
    match fs::symlink_metadata(dst) {
        Ok(_) => {
            if fs::remove_file(dst).is_err() {
                fs::remove_dir_all(dst).map_err(DeployError::io(dst))?;
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(DeployError::Io {
            path: dst.to_path_buf(),
            source,
        }),
    }
}

#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

fn copy_tree(src: &Path, dst: &Path) -> Result<(), DeployError> {
    fs::create_dir_all(dst).map_err(DeployError::io(dst))?;
    for entry in fs::read_dir(src).map_err(DeployError::io(src))? {
        let entry = entry.map_err(DeployError::io(src))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(DeployError::io(&from))?;
        }
    }
    Ok(())
}

fn copy_matching(
    dir: &Path,
    bin: &Path,
    matches: fn(&str) -> bool,
    copied: &mut Vec<PathBuf>,
) -> Result<(), DeployError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(DeployError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    for entry in entries {
        let entry = entry.map_err(DeployError::io(dir))?;
        let from = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !matches(&name) || !from.is_file() {
            continue;
        }

        let to = bin.join(&name);
        fs::copy(&from, &to).map_err(DeployError::io(&from))?;
        tracing::debug!(from = %from.display(), to = %to.display(), "copied runtime library");
        copied.push(to);
    }
    Ok(())
}

// python*.dll, python*.zip
fn is_root_library(name: &str) -> bool {
    name.starts_with("python") && (name.ends_with(".dll") || name.ends_with(".zip"))
}

// libpython*.so*, libpython*.dylib
fn is_lib_library(name: &str) -> bool {
    match name.strip_prefix("libpython") {
        Some(rest) => rest.contains(".so") || rest.ends_with(".dylib"),
        None => false,
    }
}
