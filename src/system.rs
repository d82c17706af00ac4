//! Filesystem and OS services used by a run.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{AsgenError, Result};

/// Directory under the user's home holding asgen state.
pub const HOME_DIRNAME: &str = ".asgen";

/// Scratch directory, relative to the current directory.
pub const TEMP_DIRNAME: &str = ".temp";

/// OS services a run depends on.
pub trait System {
    fn current_dir(&self) -> Result<PathBuf>;

    /// `~/.asgen`
    fn home_dir(&self) -> Result<PathBuf>;

    /// `<cwd>/.temp`
    fn temp_dir(&self) -> Result<PathBuf> {
        Ok(self.current_dir()?.join(TEMP_DIRNAME))
    }

    /// Create `path` and any missing parents.
    fn make_dir(&self, path: &Path) -> Result<()>;

    /// Remove `path` and everything below it.
    fn remove_dir(&self, path: &Path) -> Result<()>;
}

/// [`System`] backed by the host OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostSystem;

impl System for HostSystem {
    fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().map_err(|e| AsgenError::Io {
            path: PathBuf::from("."),
            message: format!("Failed to resolve current directory: {}", e),
        })
    }

    fn home_dir(&self) -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(HOME_DIRNAME))
            .ok_or_else(|| AsgenError::Config {
                message: "Could not determine home directory".to_string(),
                help: Some("Set the HOME environment variable".to_string()),
            })
    }

    fn make_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| AsgenError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to create directory: {}", e),
        })
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        fs::remove_dir_all(path).map_err(|e| AsgenError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to remove directory: {}", e),
        })
    }
}

/// Path of `target` relative to the directory `base`.
///
/// Both paths should be absolute (or both relative to the same root).
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let target: Vec<Component> = target.components().filter(|c| *c != Component::CurDir).collect();

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// Render a path with forward slashes, as embedded in generated modules.
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
