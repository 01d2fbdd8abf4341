//! RxNorm concept row type.
//!
//! This module provides the `ConsoRow` struct representing a row from
//! `RXNCONSO.RRF`, restricted to the columns the export consumes.

use crate::{Rxcui, Suppress, TermType};

/// A row from the RxNorm concept names and sources table (RXNCONSO).
///
/// One RXCUI usually appears on many rows: one per source vocabulary,
/// language and term type.
///
/// # Examples
///
/// ```
/// use rxnorm_types::{ConsoRow, Suppress, TermType};
///
/// let row = ConsoRow {
///     rxcui: 723,
///     language: "ENG".to_string(),
///     term_status: "P".to_string(),
///     sab: "RXNORM".to_string(),
///     tty: "IN".to_string(),
///     code: "723".to_string(),
///     name: "amoxicillin".to_string(),
///     suppress: Suppress::NotSuppressed,
/// };
///
/// assert_eq!(row.term_type(), Some(TermType::Ingredient));
/// assert!(row.is_preferred_term());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsoRow {
    /// Concept identifier.
    pub rxcui: Rxcui,
    /// Language of the name (LAT), e.g. `ENG`.
    pub language: String,
    /// Term status (TS); `P` marks the preferred term.
    pub term_status: String,
    /// Source vocabulary abbreviation (SAB).
    pub sab: String,
    /// Raw term type code (TTY).
    pub tty: String,
    /// Source code (CODE); for MTHSPL `SU` rows this is the UNII.
    pub code: String,
    /// Display name (STR).
    pub name: String,
    /// Suppression flag.
    pub suppress: Suppress,
}

impl ConsoRow {
    /// Returns the parsed term type, if it is one the hierarchy uses.
    pub fn term_type(&self) -> Option<TermType> {
        TermType::from_code(&self.tty)
    }

    /// Returns true if this row carries the preferred term (TS = `P`).
    pub fn is_preferred_term(&self) -> bool {
        self.term_status == "P"
    }
}

/// A resolved concept as held by the concept index.
///
/// Built from the first eligible [`ConsoRow`] for an RXCUI; see the loader
/// for the name selection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Concept {
    /// Concept identifier.
    pub rxcui: Rxcui,
    /// Display name.
    pub name: String,
    /// Term type.
    pub tty: TermType,
    /// Source vocabulary the name came from.
    pub sab: String,
    /// Language of the name.
    pub language: String,
    /// Suppression flag of the row the name came from.
    pub suppress: Suppress,
}
