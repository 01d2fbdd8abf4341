//! RxNorm relationship row type.
//!
//! This module provides the `RelRow` struct representing a row from
//! `RXNREL.RRF`.

use crate::{LabelFamily, Rxcui};

/// A row from the RxNorm relationship table (RXNREL).
///
/// Rows are directed (`rxcui1` REL/RELA `rxcui2`), but RxNorm emits the
/// inverse row as well, so the pair is really one undirected link.
///
/// # Examples
///
/// ```
/// use rxnorm_types::{LabelFamily, RelRow};
///
/// let row = RelRow {
///     rxcui1: 1596450,
///     stype1: "CUI".to_string(),
///     rel: "RO".to_string(),
///     rxcui2: 723,
///     stype2: "CUI".to_string(),
///     rela: "has_ingredient".to_string(),
///     sab: "RXNORM".to_string(),
///     suppress: "N".to_string(),
/// };
///
/// assert!(row.links_concepts());
/// assert_eq!(row.label_family(), Some(LabelFamily::Ingredient));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelRow {
    /// First concept.
    pub rxcui1: Rxcui,
    /// Kind of the first identifier (STYPE1), e.g. `CUI` or `AUI`.
    pub stype1: String,
    /// Coarse relationship (REL).
    pub rel: String,
    /// Second concept.
    pub rxcui2: Rxcui,
    /// Kind of the second identifier (STYPE2).
    pub stype2: String,
    /// Relationship attribute label (RELA).
    pub rela: String,
    /// Source vocabulary abbreviation (SAB).
    pub sab: String,
    /// Suppression flag, kept raw; RXNREL leaves it empty on most rows.
    pub suppress: String,
}

impl RelRow {
    /// Returns true if both endpoints are concept-level identifiers.
    pub fn links_concepts(&self) -> bool {
        self.stype1 == "CUI" && self.stype2 == "CUI"
    }

    /// Returns the label family of this row's RELA, if recognized.
    pub fn label_family(&self) -> Option<LabelFamily> {
        LabelFamily::from_rela(&self.rela)
    }
}
