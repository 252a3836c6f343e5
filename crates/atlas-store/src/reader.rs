//! Reading JSON snapshot documents.
//!
//! Two read modes are provided. [`read_json`] is for callers that want to
//! react differently to a corrupt snapshot than to a missing one.
//! [`read_json_tolerant`] is for callers whose recovery path is identical in
//! both cases - start from an empty state - and only want the failure noted
//! in the log.

use crate::Result;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

/// Reads a JSON document from `path`.
///
/// Returns `Ok(None)` if the file does not exist. An existing file that
/// cannot be read or parsed is an error, not an absence.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be opened, read, or
/// deserialized into `T`.
pub fn read_json<T, P>(path: P) -> Result<Option<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(value))
}

/// Reads a JSON document from `path`, treating any failure as absence.
///
/// A missing file returns `None` silently. A file that exists but cannot be
/// read or parsed also returns `None`, with a warning logged - the caller is
/// expected to fall back to an empty state and rebuild.
pub fn read_json_tolerant<T, P>(path: P) -> Option<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match read_json(path) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Discarding unreadable snapshot"
            );
            None
        }
    }
}
