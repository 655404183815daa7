use anyhow::{Result, Context};
use log::{debug, warn};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::errors::OutputError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Check whether a path ends in one of `extensions` (case-insensitive, leading dot optional)
    pub fn has_extension<P: AsRef<Path>>(path: P, extensions: &[String]) -> bool {
        let Some(ext) = path.as_ref().extension() else {
            return false;
        };
        let ext = ext.to_string_lossy();
        extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }

    /// Recursively find files with any of the given extensions
    ///
    /// Results are sorted by their full path, byte-wise, so `a b/x` comes
    /// before `a/x`. Unreadable directory entries are logged and skipped.
    pub fn find_files_with_extensions<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow::anyhow!("Library directory does not exist: {:?}", dir));
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_file() && Self::has_extension(path, extensions) {
                result.push(path.to_path_buf());
            } else {
                debug!("Ignoring {:?}", path);
            }
        }

        result.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        Ok(result)
    }

    /// Path of `path` relative to `root`, using `/` separators
    pub fn relative_name<P1: AsRef<Path>, P2: AsRef<Path>>(root: P1, path: P2) -> String {
        let path = path.as_ref();
        let relative = path.strip_prefix(root.as_ref()).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Backup location for `path`: the same file name with `suffix` appended
    pub fn backup_path<P: AsRef<Path>>(path: P, suffix: &str) -> PathBuf {
        let mut name: OsString = path.as_ref().as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Copy `path` to its backup location and return that location
    pub fn create_backup<P: AsRef<Path>>(path: P, suffix: &str) -> std::result::Result<PathBuf, OutputError> {
        let path = path.as_ref();
        let backup = Self::backup_path(path, suffix);

        fs::copy(path, &backup).map_err(|source| OutputError::Backup {
            path: path.to_path_buf(),
            backup: backup.clone(),
            source,
        })?;

        debug!("Backed up {:?} to {:?}", path, backup);
        Ok(backup)
    }

    /// Replace the contents of `path` without ever leaving a partially written file
    ///
    /// The content goes to a temporary file in the destination directory
    /// which is then renamed over `path`. The parent directory must exist.
    pub fn write_atomically<P: AsRef<Path>>(path: P, content: &[u8]) -> std::result::Result<(), OutputError> {
        let path = path.as_ref();
        let write_error = |source: std::io::Error| OutputError::Write {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(parent).map_err(write_error)?;
        // Keep the mode of the file being replaced
        if let Ok(metadata) = fs::metadata(path) {
            temp.as_file().set_permissions(metadata.permissions()).map_err(write_error)?;
        }
        temp.write_all(content).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;
        temp.persist(path).map_err(|e| write_error(e.error))?;

        Ok(())
    }
}
