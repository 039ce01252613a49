//! Temp-file-plus-rename replacement and permissive loading.

use super::{StoreError, StoreResult};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const TEMP_PREFIX: &str = ".tmp_";
const TEMP_SUFFIX: &str = ".json";

/// Loads a JSON document of any shape.
///
/// Returns `None` when the file is missing, unreadable, or not valid JSON.
pub fn load_json(path: impl AsRef<Path>) -> Option<Value> {
    load_document(path)
}

/// Loads and decodes a JSON document into `T`.
///
/// Returns `None` when the file is missing, unreadable, not valid JSON, or
/// does not match `T`. Every failure except "missing" is logged as a warning.
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Option<T> {
    let path = path.as_ref();
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(
                "event=store_load module=store status=missing path={}",
                path.display()
            );
            return None;
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=error error_code=read_failed path={} error={}",
                path.display(),
                err
            );
            return None;
        }
    };

    match serde_json::from_slice(&raw) {
        Ok(document) => {
            debug!(
                "event=store_load module=store status=ok path={} bytes={}",
                path.display(),
                raw.len()
            );
            Some(document)
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=error error_code=parse_failed path={} error={}",
                path.display(),
                err
            );
            None
        }
    }
}

/// Serializes `document` as indented JSON and atomically replaces `path`.
///
/// The document is written to a temporary sibling of `path`, flushed and
/// synced, then renamed over the target. Missing parent directories are
/// created first.
///
/// # Errors
/// Returns a [`StoreError`] describing the failed step. The target is left
/// as it was and the temporary file has been removed.
pub fn write_json<T>(path: impl AsRef<Path>, document: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let started_at = Instant::now();

    match replace_file(path, document) {
        Ok(()) => {
            debug!(
                "event=store_write module=store status=ok path={} duration_ms={}",
                path.display(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=store_write module=store status=error error_code={} path={} duration_ms={} error={}",
                err.code(),
                path.display(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn replace_file<T>(path: &Path, document: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
{
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    // Same directory as the target so the rename never crosses a filesystem.
    // Dropping `temp` on any early return deletes the file.
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(&dir)
        .map_err(|source| StoreError::CreateTemp {
            dir: dir.clone(),
            source,
        })?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, document).map_err(|source| {
            StoreError::Serialize {
                path: path.to_path_buf(),
                source,
            }
        })?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|source| StoreError::Write {
                path: path.to_path_buf(),
                source,
            })?;
    }

    temp.as_file()
        .sync_all()
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    temp.persist(path).map_err(|err| StoreError::Persist {
        path: path.to_path_buf(),
        source: err.error,
    })?;

    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
