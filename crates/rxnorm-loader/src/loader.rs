//! RRF file discovery and loading utilities.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{RrfError, RrfFiles, RrfResult, RrfTable};

/// Discovers the RRF tables of an RxNorm release.
///
/// Accepts the `rrf` directory itself, the release root containing it, or a
/// parent directory holding an unpacked release. Every table is expected
/// next to `RXNCONSO.RRF`.
pub fn discover_rrf_files<P: AsRef<Path>>(path: P) -> RrfResult<RrfFiles> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(RrfError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let rrf_dir = find_rrf_dir(path)?;
    let mut files = RrfFiles::new();

    for table in [
        RrfTable::Concepts,
        RrfTable::Relationships,
        RrfTable::Attributes,
    ] {
        let candidate = rrf_dir.join(table.file_name());
        if !candidate.is_file() {
            return Err(RrfError::MissingInputFile {
                table,
                path: candidate.display().to_string(),
            });
        }
        match table {
            RrfTable::Concepts => files.concept_file = Some(candidate),
            RrfTable::Relationships => files.relationship_file = Some(candidate),
            RrfTable::Attributes => files.attribute_file = Some(candidate),
        }
    }

    files.release_date = rrf_dir
        .ancestors()
        .take(2)
        .filter_map(|dir| dir.file_name())
        .find_map(|name| extract_release_date(&name.to_string_lossy()));
    files.directory = rrf_dir;

    Ok(files)
}

/// Finds the directory holding `RXNCONSO.RRF`.
fn find_rrf_dir(base: &Path) -> RrfResult<PathBuf> {
    let marker = RrfTable::Concepts.file_name();

    // Check base and base/rrf
    for dir in [base.to_path_buf(), base.join("rrf")] {
        if dir.join(marker).is_file() {
            return Ok(dir);
        }
    }

    // Search one level deep, in name order
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            subdirs.push(entry.path());
        }
    }
    subdirs.sort();

    for subdir in subdirs {
        for dir in [subdir.join("rrf"), subdir] {
            if dir.join(marker).is_file() {
                return Ok(dir);
            }
        }
    }

    // Nothing found: report the concepts table as missing from the base.
    Err(RrfError::MissingInputFile {
        table: RrfTable::Concepts,
        path: base.join(marker).display().to_string(),
    })
}

/// Extracts the release date from a release directory name.
///
/// Release directories look like `RxNorm_full_10062025`.
fn extract_release_date(dir_name: &str) -> Option<String> {
    let last = dir_name.rsplit('_').next()?;
    if last.len() == 8 && last.chars().all(|c| c.is_ascii_digit()) {
        return Some(last.to_string());
    }
    None
}

/// Formats a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
