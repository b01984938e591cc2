use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("target is a directory: {0}")]
    TargetIsDirectory(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the directory that will hold `target` exists; create it if missing.
pub fn ensure_parent_dir(target: &Path) -> Result<(), PersistError> {
    let Some(dir) = parent_of(target) else {
        return Ok(());
    };
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Write `content` to `target` through a temp file in the same directory, then rename.
///
/// Readers see either the previous file or the complete new one.
pub fn write_atomically(target: &Path, content: &str) -> Result<(), PersistError> {
    if target.is_dir() {
        return Err(PersistError::TargetIsDirectory(target.display().to_string()));
    }
    ensure_parent_dir(target)?;

    let dir = parent_of(target).unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}

/// `Path::parent` yields `Some("")` for bare file names.
fn parent_of(target: &Path) -> Option<&Path> {
    target.parent().filter(|dir| !dir.as_os_str().is_empty())
}
