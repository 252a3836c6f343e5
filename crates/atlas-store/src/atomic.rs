//! Atomic write operations for JSON snapshot documents.
//!
//! A snapshot overwrites its predecessor on every save, so a crash mid-write
//! must not be able to destroy the only copy. Writes here use the
//! temp-file-then-rename pattern:
//!
//! 1. The document is serialized to a temporary file with a `.tmp` extension
//! 2. The temporary file is flushed and closed
//! 3. The temporary file is atomically renamed to the target path
//!
//! If a crash occurs during step 1 or 2, the original file remains intact.
//! The temporary file may be left behind, but data integrity is preserved.

use crate::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Atomically writes a value as a JSON document to `path`.
///
/// The value is serialized to a temporary file alongside the target and then
/// renamed over it, so the target is never observed in a partially-written
/// state. The parent directory is created if it does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory or temporary file cannot be created
/// - The value fails to serialize
/// - An I/O error occurs during writing
/// - The atomic rename fails (e.g., cross-filesystem move)
///
/// On failure, the original file (if it exists) is left unchanged and a
/// best-effort attempt is made to remove the temporary file.
pub fn write_json_atomic<T, P>(path: P, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = make_temp_path(path);

    if let Err(e) = write_to_temp_file(&temp_path, value) {
        // Best-effort cleanup of temp file
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    std::fs::rename(&temp_path, path)?;

    Ok(())
}

/// Creates a temporary file path for atomic write operations.
///
/// The temp path is created by appending `.tmp` to the original filename.
/// If the original path has no extension, `.tmp` is appended directly.
/// If it has an extension, the extension becomes `{ext}.tmp`.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

/// Writes the serialized value to a temporary file, ensuring flush and close.
fn write_to_temp_file<T>(temp_path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let file = File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
