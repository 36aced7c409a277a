//! Atomic file output for schemas, chunks and images.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// Serialize `value` as pretty-printed JSON and write it atomically.
///
/// # Errors
///
/// Returns an error if serialization or any file operation fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    write_bytes(path, content.as_bytes())
}

/// Write `data` to `path`, creating parent directories as needed.
///
/// The data goes to a hidden temp file next to the target first, which is
/// synced and then renamed over the target.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn write_bytes(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_file = temp_path(path);
    {
        let mut file = File::create(&temp_file)?;
        file.write_all(data)?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
