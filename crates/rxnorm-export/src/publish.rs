//! Atomic publishing of output files and directories.
//!
//! Outputs are written next to their destination under a hidden temporary
//! name and renamed into place only once complete. A failed write removes
//! the temporary and leaves any previous output untouched.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ExportError, ExportResult};

/// Buffer size for output writers.
const WRITE_BUFFER: usize = 1024 * 1024;

/// Writes a file through `write` and renames it over `target`.
pub fn publish_file<F>(target: &Path, write: F) -> ExportResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> ExportResult<()>,
{
    ensure_parent(target)?;
    let tmp = sibling(target, "tmp");

    let result = write_file(&tmp, write).and_then(|()| {
        fs::rename(&tmp, target).map_err(|e| ExportError::write_failure(target, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_file<F>(tmp: &Path, write: F) -> ExportResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> ExportResult<()>,
{
    let file = File::create(tmp).map_err(|e| ExportError::write_failure(tmp, e))?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER, file);
    write(&mut writer)?;

    let file = writer
        .into_inner()
        .map_err(|e| ExportError::write_failure(tmp, e.into_error()))?;
    file.sync_all().map_err(|e| ExportError::write_failure(tmp, e))
}

/// Builds a directory through `build` and swaps it in for `target`.
///
/// `build` receives the temporary directory to populate.
pub fn publish_dir<T, F>(target: &Path, build: F) -> ExportResult<T>
where
    F: FnOnce(&Path) -> ExportResult<T>,
{
    ensure_parent(target)?;
    let tmp = sibling(target, "tmp");
    remove_path(&tmp);
    fs::create_dir_all(&tmp).map_err(|e| ExportError::write_failure(&tmp, e))?;

    let value = match build(&tmp) {
        Ok(value) => value,
        Err(e) => {
            remove_path(&tmp);
            return Err(e);
        }
    };

    if let Err(e) = swap_in(&tmp, target) {
        remove_path(&tmp);
        return Err(e);
    }
    Ok(value)
}

fn swap_in(tmp: &Path, target: &Path) -> ExportResult<()> {
    if !target.exists() {
        return fs::rename(tmp, target).map_err(|e| ExportError::write_failure(target, e));
    }

    let old = sibling(target, "old");
    fs::rename(target, &old).map_err(|e| ExportError::write_failure(target, e))?;

    if let Err(e) = fs::rename(tmp, target) {
        let _ = fs::rename(&old, target);
        return Err(ExportError::write_failure(target, e));
    }

    remove_path(&old);
    Ok(())
}

/// Hidden sibling path unique to this process and call.
fn sibling(target: &Path, suffix: &str) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    target.with_file_name(format!(
        ".{}.{}_{}.{}",
        name,
        std::process::id(),
        seq,
        suffix
    ))
}

fn ensure_parent(target: &Path) -> ExportResult<()> {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ExportError::write_failure(parent, e))
        }
        _ => Ok(()),
    }
}

fn remove_path(path: &Path) {
    if path.is_dir() {
        let _ = fs::remove_dir_all(path);
    } else if path.exists() {
        let _ = fs::remove_file(path);
    }
}
