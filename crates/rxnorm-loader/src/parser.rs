//! Generic RRF file parser.
//!
//! Provides a streaming parser for RxNorm pipe-delimited RRF files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use rxnorm_types::{Rxcui, Suppress};

use crate::types::{RrfError, RrfResult, RrfTable};

/// Trait for types that can be parsed from RRF rows.
///
/// Implement this trait for custom RRF record types.
pub trait RrfRecord: Sized {
    /// The table this record type is read from.
    const TABLE: RrfTable;

    /// Minimum number of fields a row must have.
    const MIN_FIELDS: usize;

    /// Parse a record from a CSV StringRecord.
    ///
    /// The parser has already checked the row against `MIN_FIELDS`.
    fn from_record(record: &StringRecord) -> RrfResult<Self>;
}

/// A streaming parser for RRF files.
///
/// This parser reads RRF files row-by-row to avoid loading entire files
/// into memory. Rows that are too short, fail a field conversion or are not
/// valid UTF-8 are skipped and counted; only I/O failures end iteration
/// with an error.
pub struct RrfParser<R: Read, T: RrfRecord> {
    reader: Reader<R>,
    record: StringRecord,
    records_read: usize,
    malformed_records: usize,
    _marker: PhantomData<T>,
}

impl<T: RrfRecord> RrfParser<BufReader<File>, T> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns [`RrfError::MissingInputFile`] if the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> RrfResult<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|_| RrfError::MissingInputFile {
            table: T::TABLE,
            path: path.display().to_string(),
        })?;
        Ok(Self::from_reader(BufReader::with_capacity(1 << 20, file)))
    }
}

impl<R: Read, T: RrfRecord> RrfParser<R, T> {
    /// Creates a new parser from a reader.
    pub fn from_reader(reader: R) -> Self {
        // RRF has no header row and no quoting: a `"` inside a name is data.
        let csv_reader = ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self {
            reader: csv_reader,
            record: StringRecord::new(),
            records_read: 0,
            malformed_records: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of rows read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Returns the number of malformed rows skipped so far.
    pub fn malformed_records(&self) -> usize {
        self.malformed_records
    }
}

impl<R: Read, T: RrfRecord> Iterator for RrfParser<R, T> {
    type Item = RrfResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {
                    self.records_read += 1;

                    if self.records_read == 1 {
                        strip_bom(&mut self.record);
                    }

                    if self.record.len() < T::MIN_FIELDS {
                        self.malformed_records += 1;
                        continue;
                    }

                    match T::from_record(&self.record) {
                        Ok(parsed) => return Some(Ok(parsed)),
                        Err(e) if e.is_malformed_record() => {
                            self.malformed_records += 1;
                            continue;
                        }
                        Err(e) => return Some(Err(e)),
                    }
                }
                Ok(false) => return None, // End of file
                Err(e) if e.is_io_error() => return Some(Err(e.into())),
                Err(_) => {
                    // Undecodable line; the reader has already moved past it.
                    self.records_read += 1;
                    self.malformed_records += 1;
                }
            }
        }
    }
}

/// Removes a UTF-8 byte-order mark from the first field.
fn strip_bom(record: &mut StringRecord) {
    if record.get(0).is_some_and(|f| f.starts_with('\u{feff}')) {
        let stripped: StringRecord = record
            .iter()
            .enumerate()
            .map(|(i, f)| if i == 0 { f.trim_start_matches('\u{feff}') } else { f })
            .collect();
        *record = stripped;
    }
}

/// Helper functions for parsing RRF field values.
pub mod parse {
    use super::{RrfError, RrfResult, Rxcui, StringRecord, Suppress};

    /// Returns the field at `index`, or an empty string past the end.
    pub fn field(record: &StringRecord, index: usize) -> &str {
        record.get(index).unwrap_or("")
    }

    /// Parses an RXCUI from a string.
    pub fn rxcui(value: &str) -> RrfResult<Rxcui> {
        value.parse::<Rxcui>().map_err(|_| RrfError::InvalidRxcui {
            value: value.to_string(),
        })
    }

    /// Parses a SUPPRESS flag.
    pub fn suppress(value: &str) -> RrfResult<Suppress> {
        Suppress::from_code(value).ok_or_else(|| RrfError::InvalidSuppress {
            value: value.to_string(),
        })
    }
}
