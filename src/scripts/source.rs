//! Update script discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, UpdateError};
use crate::shell::is_executable;

/// One entry found in the script directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Full path to the entry.
    pub path: PathBuf,
    /// Regular file with an executable bit set.
    pub executable: bool,
}

impl ScriptEntry {
    /// Create an entry.
    pub fn new(path: impl Into<PathBuf>, executable: bool) -> Self {
        Self {
            path: path.into(),
            executable,
        }
    }
}

/// Lists candidate update scripts in a stable order.
pub trait ScriptSource {
    /// Every entry, sorted by file name.
    fn entries(&self) -> Result<Vec<ScriptEntry>>;
}

/// Scripts in a directory on disk (not recursive).
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Source over `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl ScriptSource for DirectorySource {
    fn entries(&self) -> Result<Vec<ScriptEntry>> {
        if !self.dir.is_dir() {
            return Err(UpdateError::ScriptDirNotFound {
                path: self.dir.clone(),
            });
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            paths.push(entry?.path());
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(paths
            .into_iter()
            .map(|path| {
                let executable = is_executable(&path);
                ScriptEntry { path, executable }
            })
            .collect())
    }
}
