//! Ordering, partitioning and JSON writers for the ingredient forest.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use rxnorm_types::{IngredientNode, Rxcui};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};
use crate::publish::{publish_dir, publish_file};

/// Manifest file name inside a partitioned directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Data subdirectory inside a partitioned directory.
pub const DATA_DIR: &str = "data";

/// Partition bucket of an ingredient, by the first character of its name.
///
/// Buckets order as digits, then `A` through `Z`, then everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// Names starting with an ASCII digit.
    Digits,
    /// Names starting with an ASCII letter, stored uppercase.
    Letter(u8),
    /// Everything else, including empty names.
    Other,
}

impl Bucket {
    /// Buckets a display name.
    pub fn of(name: &str) -> Self {
        match name.chars().next() {
            Some(c) if c.is_ascii_digit() => Self::Digits,
            Some(c) if c.is_ascii_alphabetic() => Self::Letter(c.to_ascii_uppercase() as u8),
            _ => Self::Other,
        }
    }

    /// Key used in the manifest and as the data file stem.
    pub fn key(self) -> String {
        match self {
            Self::Digits => "0-9".to_string(),
            Self::Letter(c) => char::from(c).to_string(),
            Self::Other => "other".to_string(),
        }
    }

    /// Human-readable label for the viewer's index.
    pub fn label(self) -> String {
        match self {
            Self::Digits => "0-9".to_string(),
            Self::Letter(c) => char::from(c).to_string(),
            Self::Other => "Other".to_string(),
        }
    }

    /// Path of the bucket's data file, relative to the partition directory.
    pub fn file(self) -> String {
        format!("{}/{}.json", DATA_DIR, self.key())
    }

    fn class_rank(self) -> u8 {
        match self {
            Self::Digits => 0,
            Self::Letter(_) => 1,
            Self::Other => 2,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Ordering key of a top-level ingredient.
///
/// Compares the initial-character class first, then the case-folded name,
/// then the RXCUI. Within names that start with a digit or letter this is
/// plain case-insensitive order, and every bucket is a contiguous run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    class: u8,
    folded: String,
    rxcui: Rxcui,
}

impl SortKey {
    /// Builds the key for an ingredient.
    pub fn of(node: &IngredientNode) -> Self {
        Self {
            class: Bucket::of(&node.name).class_rank(),
            folded: node.name.to_lowercase(),
            rxcui: node.rxcui,
        }
    }
}

/// Sorts top-level ingredients into export order.
pub fn sort_ingredients(ingredients: &mut [IngredientNode]) {
    ingredients.sort_by_cached_key(SortKey::of);
}

/// Compares two ingredients in export order.
pub fn export_order(a: &IngredientNode, b: &IngredientNode) -> Ordering {
    SortKey::of(a).cmp(&SortKey::of(b))
}

/// One bucket's contiguous slice of the sorted forest.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    /// The bucket.
    pub bucket: Bucket,
    /// Entries in export order.
    pub entries: &'a [IngredientNode],
}

/// Splits a sorted forest into buckets without reordering it.
pub fn partition(sorted: &[IngredientNode]) -> Vec<Partition<'_>> {
    let mut partitions: Vec<Partition<'_>> = Vec::new();
    let mut start = 0;

    while start < sorted.len() {
        let bucket = Bucket::of(&sorted[start].name);
        let len = sorted[start..]
            .iter()
            .take_while(|node| Bucket::of(&node.name) == bucket)
            .count();
        partitions.push(Partition {
            bucket,
            entries: &sorted[start..start + len],
        });
        start += len;
    }

    partitions
}

/// Manifest entry for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Display label.
    pub label: String,
    /// Data file path relative to the manifest.
    pub file: String,
    /// Number of ingredients in the bucket.
    pub count: usize,
}

/// Index of a partitioned export, keyed by bucket key.
///
/// Bucket keys sort in bucket order (`0-9`, `A`..`Z`, `other`), so the
/// serialized object lists buckets in export order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    buckets: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Builds the manifest for a set of partitions.
    pub fn from_partitions(partitions: &[Partition<'_>]) -> Self {
        let buckets = partitions
            .iter()
            .map(|p| {
                let entry = ManifestEntry {
                    label: p.bucket.label(),
                    file: p.bucket.file(),
                    count: p.entries.len(),
                };
                (p.bucket.key(), entry)
            })
            .collect();
        Self { buckets }
    }

    /// Returns the entry for a bucket key.
    pub fn get(&self, key: &str) -> Option<&ManifestEntry> {
        self.buckets.get(key)
    }

    /// Iterates entries in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total entries across all buckets.
    pub fn total(&self) -> usize {
        self.buckets.values().map(|e| e.count).sum()
    }
}

/// Writes the whole forest as one pretty-printed JSON array.
pub fn write_aggregate(path: &Path, sorted: &[IngredientNode]) -> ExportResult<()> {
    publish_file(path, |w| {
        serde_json::to_writer_pretty(&mut *w, sorted).map_err(|e| json_error(path, e))?;
        w.write_all(b"\n").map_err(|e| ExportError::write_failure(path, e))
    })
}

/// Writes one compact JSON ingredient per line.
pub fn write_ndjson(path: &Path, sorted: &[IngredientNode]) -> ExportResult<()> {
    publish_file(path, |w| {
        for node in sorted {
            serde_json::to_writer(&mut *w, node).map_err(|e| json_error(path, e))?;
            w.write_all(b"\n").map_err(|e| ExportError::write_failure(path, e))?;
        }
        Ok(())
    })
}

/// Writes the manifest and one data file per bucket under `dir`.
pub fn write_partitioned(dir: &Path, sorted: &[IngredientNode]) -> ExportResult<Manifest> {
    let partitions = partition(sorted);
    let manifest = Manifest::from_partitions(&partitions);

    publish_dir(dir, |tmp| {
        let data_dir = tmp.join(DATA_DIR);
        fs::create_dir_all(&data_dir).map_err(|e| ExportError::write_failure(&data_dir, e))?;

        for part in &partitions {
            let path = tmp.join(part.bucket.file());
            write_json(&path, part.entries)?;
        }

        write_json(&tmp.join(MANIFEST_FILE), &manifest)
    })?;

    Ok(manifest)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ExportResult<()> {
    let file = fs::File::create(path).map_err(|e| ExportError::write_failure(path, e))?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|e| json_error(path, e))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| ExportError::write_failure(path, e))
}

/// Maps serde_json errors, keeping I/O failures as write failures.
fn json_error(path: &Path, err: serde_json::Error) -> ExportError {
    if err.is_io() {
        ExportError::write_failure(path, io::Error::from(err))
    } else {
        ExportError::Serialize(err)
    }
}
