use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::sanitize_component;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Resolve `{output_dir}/{query}` and make it ready for writing.
///
/// With `force_replace`, an existing directory for the query is removed first
/// so that only files from the coming run remain.
pub fn prepare_query_dir(
    output_dir: &Path,
    query: &str,
    force_replace: bool,
) -> Result<PathBuf, PersistError> {
    let dir = output_dir.join(sanitize_component(query));
    if force_replace && dir.is_dir() {
        engine_info!("Removing existing directory {}", dir.display());
        fs::remove_dir_all(&dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    ensure_output_dir(&dir)?;
    Ok(dir)
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
///
/// The directory must already exist; see [`prepare_query_dir`].
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: impl AsRef<[u8]>) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_ref())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep determinism.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
