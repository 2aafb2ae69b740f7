//! Filesystem implementation of the Backend trait.
//!
//! Atomic writes go through a sibling temp file: write, `sync_all`, rename
//! over the final name, then sync the parent directory so the rename itself
//! survives a power loss.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use crate::backend::{Backend, RecordFile};
use crate::error::{Result, StoreError};
use crate::layout;

/// Backend over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBackend;

impl FsBackend {
    /// Create a filesystem backend.
    pub const fn new() -> Self {
        Self
    }
}

/// Flush directory metadata (the rename) to disk.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| StoreError::io(dir, e))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

impl Backend for FsBackend {
    fn ensure_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| StoreError::io(path, e))?;
        if !path.is_dir() {
            return Err(StoreError::io(
                path,
                io::Error::new(ErrorKind::AlreadyExists, "exists and is not a directory"),
            ));
        }
        Ok(())
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let tmp = layout::temp_path(path);

        let written = File::create(&tmp).and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&tmp, e));
        }

        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(path, e));
        }

        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => sync_dir(parent),
            _ => Ok(()),
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| StoreError::io(path, e))
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        path.try_exists().map_err(|e| StoreError::io(path, e))
    }

    fn list(&self, dir: &Path) -> Result<Vec<RecordFile>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(dir, e))?;
            let name = entry.file_name();
            let Some(seq) = name.to_str().and_then(layout::parse_record_file_name) else {
                continue;
            };
            files.push(RecordFile {
                seq,
                path: entry.path(),
            });
        }

        files.sort_by_key(|f| f.seq);
        Ok(files)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn sweep_partial(&self, dir: &Path) -> Result<usize> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::io(dir, e)),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(dir, e))?;
            let is_temp = entry
                .file_name()
                .to_str()
                .map(layout::is_temp_name)
                .unwrap_or(false);
            if is_temp {
                self.remove(&entry.path())?;
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!(dir = %dir.display(), removed, "swept partial writes");
        }
        Ok(removed)
    }
}
