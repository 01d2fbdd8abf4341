//! Parser-specific types for RRF file processing.

use std::fmt;
use std::path::PathBuf;

use rxnorm_types::TermType;
use thiserror::Error;

/// Errors that can occur while loading RRF files.
#[derive(Error, Debug)]
pub enum RrfError {
    /// I/O error reading an RRF file.
    #[error("IO error reading RRF file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid RXCUI format.
    #[error("Invalid RXCUI format: {value}")]
    InvalidRxcui {
        /// The invalid value that was encountered.
        value: String,
    },

    /// Invalid suppression flag.
    #[error("Invalid SUPPRESS value: {value} (expected N, O, E or Y)")]
    InvalidSuppress {
        /// The invalid flag value.
        value: String,
    },

    /// Row has fewer fields than the table layout requires.
    #[error("Row has {found} fields, expected at least {expected}")]
    MissingFields {
        /// Minimum field count for the table.
        expected: usize,
        /// Field count found on the row.
        found: usize,
    },

    /// A required RRF table could not be found or opened.
    #[error("Required RRF file not found: {table} (expected at {path})")]
    MissingInputFile {
        /// The table that was missing.
        table: RrfTable,
        /// Where it was looked for.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Generic parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl RrfError {
    /// Returns true for per-line errors the loader skips and counts.
    pub fn is_malformed_record(&self) -> bool {
        match self {
            Self::InvalidRxcui { .. } | Self::InvalidSuppress { .. } | Self::MissingFields { .. } => {
                true
            }
            Self::Csv(e) => !e.is_io_error(),
            _ => false,
        }
    }
}

/// Result type for RRF operations.
pub type RrfResult<T> = Result<T, RrfError>;

/// The three RRF tables the export reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RrfTable {
    /// Concept names and sources.
    Concepts,
    /// Relationships.
    Relationships,
    /// Simple attributes.
    Attributes,
}

impl RrfTable {
    /// Returns the file name of this table in an RxNorm release.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Concepts => "RXNCONSO.RRF",
            Self::Relationships => "RXNREL.RRF",
            Self::Attributes => "RXNSAT.RRF",
        }
    }
}

impl fmt::Display for RrfTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// How to choose a concept's display name when several eligible rows share
/// an RXCUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Keep the first eligible row in file order.
    #[default]
    FirstSeen,
    /// Keep the first eligible row with TS = `P`, falling back to the first
    /// eligible row when no such row exists.
    PreferTermStatus,
}

/// Configuration for RRF loading and hierarchy construction.
#[derive(Debug, Clone)]
pub struct RrfConfig {
    /// Source vocabulary the hierarchy is built from (SAB).
    pub target_sab: String,
    /// Restrict concept names to this language (LAT); `None` accepts all.
    pub language: Option<String>,
    /// Keep rows whose SUPPRESS flag is set.
    pub include_suppressed: bool,
    /// Concept term types to index.
    pub term_types: Vec<TermType>,
    /// Display name selection rule.
    pub name_policy: NamePolicy,
    /// Attribute name (ATN) holding the code list.
    pub code_attribute: String,
    /// Vocabulary of the rows carrying normalized identifiers (UNII).
    pub normalized_id_sab: String,
    /// Term type of the rows carrying normalized identifiers.
    pub normalized_id_tty: TermType,
    /// Only use relationship rows whose endpoints are both `CUI`.
    pub require_cui_stype: bool,
    /// Let PIN and MIN ingredients inherit components through related
    /// ingredients and clinical drugs.
    pub inherit_components: bool,
}

impl Default for RrfConfig {
    fn default() -> Self {
        Self {
            target_sab: "RXNORM".to_string(),
            language: Some("ENG".to_string()),
            include_suppressed: false,
            term_types: TermType::HIERARCHY.to_vec(),
            name_policy: NamePolicy::FirstSeen,
            code_attribute: "NDC".to_string(),
            normalized_id_sab: "MTHSPL".to_string(),
            normalized_id_tty: TermType::Substance,
            require_cui_stype: true,
            inherit_components: false,
        }
    }
}

impl RrfConfig {
    /// Creates a config matching the full legacy extract: preferred-term
    /// names and inherited PIN/MIN components.
    pub fn full_extract() -> Self {
        Self {
            name_policy: NamePolicy::PreferTermStatus,
            inherit_components: true,
            ..Self::default()
        }
    }

    /// Returns true if rows with this suppression flag are eligible.
    pub fn accepts_suppress(&self, suppress: rxnorm_types::Suppress) -> bool {
        self.include_suppressed || suppress.is_active()
    }

    /// Returns true if rows in this language are eligible.
    pub fn accepts_language(&self, language: &str) -> bool {
        match &self.language {
            Some(wanted) => wanted == language,
            None => true,
        }
    }
}

/// Statistics from loading one RRF table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Total rows read from the file.
    pub total_records: usize,
    /// Rows that made it into the index.
    pub accepted_records: usize,
    /// Well-formed rows dropped by a filter (vocabulary, type, language...).
    pub filtered_records: usize,
    /// Rows skipped because they were malformed (non-fatal).
    pub malformed_records: usize,
    /// Rows dropped because they referenced a concept absent from the index.
    pub dangling_references: usize,
    /// Time taken to load in milliseconds.
    pub load_time_ms: u64,
}

impl LoadStats {
    /// Returns the percentage of rows that made it into the index.
    pub fn accept_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.accepted_records as f64 / self.total_records as f64) * 100.0
        }
    }
}

/// Discovered RRF files in a release directory.
#[derive(Debug, Clone, Default)]
pub struct RrfFiles {
    /// Path to RXNCONSO.RRF.
    pub concept_file: Option<PathBuf>,
    /// Path to RXNREL.RRF.
    pub relationship_file: Option<PathBuf>,
    /// Path to RXNSAT.RRF.
    pub attribute_file: Option<PathBuf>,
    /// Directory the files were found in.
    pub directory: PathBuf,
    /// Release date taken from the release directory name (MMDDYYYY).
    pub release_date: Option<String>,
}

impl RrfFiles {
    /// Creates a new empty RrfFiles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the path of a table, if known.
    pub fn path(&self, table: RrfTable) -> Option<&PathBuf> {
        match table {
            RrfTable::Concepts => self.concept_file.as_ref(),
            RrfTable::Relationships => self.relationship_file.as_ref(),
            RrfTable::Attributes => self.attribute_file.as_ref(),
        }
    }

    /// Returns true if all three tables are present.
    pub fn has_required_files(&self) -> bool {
        self.concept_file.is_some()
            && self.relationship_file.is_some()
            && self.attribute_file.is_some()
    }

    /// Returns a list of missing tables.
    pub fn missing_files(&self) -> Vec<RrfTable> {
        [RrfTable::Concepts, RrfTable::Relationships, RrfTable::Attributes]
            .into_iter()
            .filter(|table| self.path(*table).is_none())
            .collect()
    }
}
